/// One group code / value pair.
///
/// The value keeps its leading and trailing spaces; the accessors trim
/// before converting and fall back to zero on malformed numbers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    pub code: i32,
    pub value: String,
}

impl Tag {
    pub fn new(code: i32, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.value.trim().parse().unwrap_or(0.0)
    }

    pub fn as_i32(&self) -> i32 {
        self.value.trim().parse().unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        self.value.trim()
    }

    /// True for the code-0 tag carrying `name`, compared case-insensitively.
    pub fn is_marker(&self, name: &str) -> bool {
        self.code == 0 && self.value.trim().eq_ignore_ascii_case(name)
    }
}
