//! The requirements listing itself: one entry per row, icon picked at
//! creation from the name's suffix and never revisited afterwards.

const FILE_SUFFIXES: [&str; 2] = [".mpy", ".py"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconVariant {
    File,
    Folder,
}

impl IconVariant {
    /// Suffix match is literal and case-sensitive: `lib.PY` and
    /// `archive.pyz` are folders, `archive.py` is a file.
    pub fn classify(name: &str) -> Self {
        if FILE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            IconVariant::File
        } else {
            IconVariant::Folder
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            IconVariant::File => "\u{f01a7}",
            IconVariant::Folder => "\u{e5ff}",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    name: String,
    variant: IconVariant,
}

impl Requirement {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let variant = IconVariant::classify(&name);
        Requirement { name, variant }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> IconVariant {
        self.variant
    }

    /// Replaces the display name. The icon variant stays whatever it was at
    /// creation time, even if the new name would classify differently.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn python_sources_are_files() {
        assert_eq!(IconVariant::classify("neopixel.py"), IconVariant::File);
        assert_eq!(IconVariant::classify("neopixel.mpy"), IconVariant::File);
        assert_eq!(IconVariant::classify("archive.py"), IconVariant::File);
    }

    #[test]
    fn everything_else_is_a_folder() {
        assert_eq!(IconVariant::classify("lib"), IconVariant::Folder);
        assert_eq!(IconVariant::classify("font.bdf"), IconVariant::Folder);
        // not an exact suffix match
        assert_eq!(IconVariant::classify("archive.pyz"), IconVariant::Folder);
        // the match is case-sensitive
        assert_eq!(IconVariant::classify("MAIN.PY"), IconVariant::Folder);
        assert_eq!(IconVariant::classify("   "), IconVariant::Folder);
    }

    #[test]
    fn rename_keeps_the_creation_variant() {
        let mut req = Requirement::new("lib");
        assert_eq!(req.variant(), IconVariant::Folder);

        req.rename("code.py");
        assert_eq!(req.name(), "code.py");
        assert_eq!(req.variant(), IconVariant::Folder);

        let mut req = Requirement::new("code.py");
        req.rename("lib");
        assert_eq!(req.variant(), IconVariant::File);
    }

    #[test]
    fn name_is_stored_verbatim() {
        let req = Requirement::new("  spaced name.txt ");
        assert_eq!(req.name(), "  spaced name.txt ");
    }
}

#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn suffix_decides_the_variant(name in "\\PC{0,40}") {
            let expected = if name.ends_with(".mpy") || name.ends_with(".py") {
                IconVariant::File
            } else {
                IconVariant::Folder
            };
            prop_assert_eq!(IconVariant::classify(&name), expected);
        }

        #[test]
        fn rename_never_touches_the_variant(first in "\\PC{1,40}", second in "\\PC{0,40}") {
            let mut req = Requirement::new(first.clone());
            let variant = req.variant();
            req.rename(second.clone());
            prop_assert_eq!(req.variant(), variant);
            prop_assert_eq!(req.name(), second.as_str());
        }
    }
}
