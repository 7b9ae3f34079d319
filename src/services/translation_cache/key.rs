/// Description fields that get a Chinese counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescField {
    Desc,
    ShortDesc,
}

impl DescField {
    pub const ALL: [DescField; 2] = [DescField::Desc, DescField::ShortDesc];

    pub fn source_key(self) -> &'static str {
        match self {
            DescField::Desc => "desc",
            DescField::ShortDesc => "shortDesc",
        }
    }

    pub fn chinese_key(self) -> &'static str {
        match self {
            DescField::Desc => "chineseDesc",
            DescField::ShortDesc => "chineseShortDesc",
        }
    }

    /// Cache key: `<name>_desc` or `<name>_shortDesc`.
    ///
    /// Caches are per category, so keys only collide when a category holds the
    /// same name twice.
    pub fn cache_key(self, name: &str) -> String {
        format!("{name}_{}", self.source_key())
    }
}
