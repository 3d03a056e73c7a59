// Math utilities and helper functions

/// An integer rectangle, used for texture sub-regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct IntRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

/// Parse the leading integer of a string, `atoi` style.
///
/// Leading whitespace is skipped and parsing stops at the first character
/// that cannot continue the number. Anything unparsable yields 0.
pub fn parse_leading_i32(s: &str) -> i32 {
    let s = s.trim_start();
    let end = numeric_prefix_len(s, false);
    s[..end].parse().unwrap_or(0)
}

/// Parse the leading float of a string, `atof` style. Unparsable input yields 0.0.
pub fn parse_leading_f32(s: &str) -> f32 {
    let s = s.trim_start();
    let mut end = numeric_prefix_len(s, true);

    // Back off trailing characters that leave the prefix unparsable ("1e", "2.")
    while end > 0 {
        if let Ok(value) = s[..end].parse::<f32>() {
            return value;
        }
        end -= 1;
    }
    0.0
}

fn numeric_prefix_len(s: &str, float: bool) -> usize {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_exp = false;

    for (i, c) in s.char_indices() {
        let accept = match c {
            '0'..='9' => true,
            '+' | '-' => i == 0 || (float && matches!(s[..i].chars().last(), Some('e' | 'E'))),
            '.' if float && !seen_dot && !seen_exp => {
                seen_dot = true;
                true
            }
            'e' | 'E' if float && !seen_exp && i > 0 => {
                seen_exp = true;
                true
            }
            _ => false,
        };

        if !accept {
            break;
        }
        end = i + c.len_utf8();
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_rect_edges() {
        let rect = IntRect::new(10, 20, 30, 40);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 60);
        assert_eq!(IntRect::default(), IntRect::new(0, 0, 0, 0));
    }

    #[test]
    fn test_parse_leading_i32() {
        assert_eq!(parse_leading_i32("42"), 42);
        assert_eq!(parse_leading_i32("  -7"), -7);
        assert_eq!(parse_leading_i32("12px"), 12);
        assert_eq!(parse_leading_i32("3.9"), 3);
        assert_eq!(parse_leading_i32(""), 0);
        assert_eq!(parse_leading_i32("abc"), 0);
        assert_eq!(parse_leading_i32("-"), 0);
    }

    #[test]
    fn test_parse_leading_f32() {
        assert_eq!(parse_leading_f32("0.25"), 0.25);
        assert_eq!(parse_leading_f32("1.5s"), 1.5);
        assert_eq!(parse_leading_f32("2."), 2.0);
        assert_eq!(parse_leading_f32("1e"), 1.0);
        assert_eq!(parse_leading_f32("1e2"), 100.0);
        assert_eq!(parse_leading_f32("-0.5"), -0.5);
        assert_eq!(parse_leading_f32(""), 0.0);
        assert_eq!(parse_leading_f32("x"), 0.0);
    }
}
