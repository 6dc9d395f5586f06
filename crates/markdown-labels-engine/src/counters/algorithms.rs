//! Counter systems that need more than a symbol table.

const ETHIOPIC_ONES: [char; 9] = ['፩', '፪', '፫', '፬', '፭', '፮', '፯', '፰', '፱'];
const ETHIOPIC_TENS: [char; 9] = ['፲', '፳', '፴', '፵', '፶', '፷', '፸', '፹', '፺'];
const ETHIOPIC_HUNDRED: char = '፻';
const ETHIOPIC_TEN_THOUSAND: char = '፼';

/// Digit and power-of-ten symbols for one of the limited Chinese styles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChineseSymbols {
    /// Zero through nine.
    pub digits: [char; 10],
    /// Ten, hundred, thousand.
    pub powers: [char; 3],
}

impl ChineseSymbols {
    pub const fn new(digits: [char; 10], powers: [char; 3]) -> Self {
        Self { digits, powers }
    }
}

/// Formats `count` in 0..=9999. Zero runs collapse to a single zero digit,
/// trailing zeros are dropped, and 10..=19 omit the leading one.
pub fn chinese(symbols: &ChineseSymbols, count: i64) -> Option<String> {
    if !(0..=9999).contains(&count) {
        return None;
    }
    if count == 0 {
        return Some(symbols.digits[0].to_string());
    }

    let digits: Vec<usize> = count
        .to_string()
        .bytes()
        .map(|b| usize::from(b - b'0'))
        .collect();
    let teens = (10..=19).contains(&count);

    let mut out = String::new();
    let mut pending_zero = false;
    for (i, &digit) in digits.iter().enumerate() {
        let power = digits.len() - 1 - i;
        if digit == 0 {
            pending_zero = true;
            continue;
        }
        if pending_zero {
            out.push(symbols.digits[0]);
            pending_zero = false;
        }
        if !(teens && power == 1) {
            out.push(symbols.digits[digit]);
        }
        if power > 0 {
            out.push(symbols.powers[power - 1]);
        }
    }
    Some(out)
}

/// Ethiopic numbering: digits are taken in pairs from the right; odd groups
/// carry the hundred mark and even non-zero groups the ten-thousand mark.
pub fn ethiopic(count: i64) -> Option<String> {
    if count < 1 {
        return None;
    }
    if count == 1 {
        return Some(ETHIOPIC_ONES[0].to_string());
    }

    let mut groups = Vec::new();
    let mut rest = count;
    while rest > 0 {
        groups.push((rest % 100) as usize);
        rest /= 100;
    }

    let top = groups.len() - 1;
    let mut out = String::new();
    for index in (0..=top).rev() {
        let group = groups[index];
        let odd = index % 2 == 1;
        let bare = group == 0 || (group == 1 && (index == top || odd));
        if !bare {
            if group / 10 > 0 {
                out.push(ETHIOPIC_TENS[group / 10 - 1]);
            }
            if group % 10 > 0 {
                out.push(ETHIOPIC_ONES[group % 10 - 1]);
            }
        }
        if odd && group != 0 {
            out.push(ETHIOPIC_HUNDRED);
        } else if !odd && index != 0 {
            out.push(ETHIOPIC_TEN_THOUSAND);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const INFORMAL: ChineseSymbols = ChineseSymbols::new(
        ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'],
        ['十', '百', '千'],
    );

    #[rstest]
    #[case(0, "零")]
    #[case(7, "七")]
    #[case(10, "十")]
    #[case(11, "十一")]
    #[case(20, "二十")]
    #[case(105, "一百零五")]
    #[case(110, "一百一十")]
    #[case(1005, "一千零五")]
    #[case(1050, "一千零五十")]
    #[case(9999, "九千九百九十九")]
    fn chinese_core(#[case] value: i64, #[case] expected: &str) {
        assert_eq!(chinese(&INFORMAL, value).as_deref(), Some(expected));
    }

    #[test]
    fn chinese_out_of_range() {
        assert_eq!(chinese(&INFORMAL, 10000), None);
        assert_eq!(chinese(&INFORMAL, -1), None);
    }

    #[rstest]
    #[case(1, "፩")]
    #[case(10, "፲")]
    #[case(100, "፻")]
    #[case(111, "፻፲፩")]
    #[case(222, "፪፻፳፪")]
    #[case(475, "፬፻፸፭")]
    #[case(10000, "፼")]
    #[case(83692, "፰፼፴፮፻፺፪")]
    #[case(78010092, "፸፰፻፩፼፺፪")]
    #[case(780100000092, "፸፰፻፩፼፼፺፪")]
    fn ethiopic_core(#[case] value: i64, #[case] expected: &str) {
        assert_eq!(ethiopic(value).as_deref(), Some(expected));
    }

    #[test]
    fn ethiopic_rejects_non_positive() {
        assert_eq!(ethiopic(0), None);
        assert_eq!(ethiopic(-5), None);
    }
}
