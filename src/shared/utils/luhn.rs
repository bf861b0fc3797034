// =====================================================
// Luhn 체크섬 검증
// Luhn checksum validation
// =====================================================
// 주문 번호는 마지막 자리가 체크 디지트인 숫자 문자열입니다.
// 오른쪽에서 두 번째 자리부터 한 칸씩 건너뛰며 2배 (9 초과 시 -9),
// 전체 합이 10의 배수이면 유효합니다.
// =====================================================

/// 숫자 문자열이 Luhn 검증을 통과하는지 확인
/// Check whether a digit string passes the Luhn check
///
/// 숫자가 아닌 문자가 하나라도 있거나 빈 문자열이면 false
pub fn is_valid_luhn(number: &str) -> bool {
    if number.is_empty() {
        return false;
    }

    let mut sum: u32 = 0;
    for (i, ch) in number.chars().rev().enumerate() {
        let Some(mut digit) = ch.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }

    sum % 10 == 0
}
