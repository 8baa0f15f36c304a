use serde::{Deserialize, Serialize};

/// Separator placed between verse fields when building a narration script
pub const NARRATION_SEPARATOR: &str = "... ";

/// A single scraped verse with optional LLM commentary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Filesystem-safe identifier, used as the stem of every derived artifact
    pub key: String,
    /// Human-readable citation (ordinal book prefix spelled out)
    pub display_name: String,
    /// Verse body with markup removed
    pub text: String,
    /// Commentary attached by the annotation stage
    pub commentary: Option<String>,
}

impl Verse {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            text: text.into(),
            commentary: None,
        }
    }

    pub fn has_commentary(&self) -> bool {
        self.commentary.is_some()
    }

    /// Ordered field list as persisted: display name, text, then commentary if present
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.display_name.as_str(), self.text.as_str()];
        if let Some(commentary) = &self.commentary {
            fields.push(commentary.as_str());
        }
        fields
    }

    /// Text sent to the speech service for this verse
    pub fn narration_script(&self) -> String {
        self.fields().join(NARRATION_SEPARATOR)
    }
}

/// Ordered collection of verses produced or loaded by one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    verses: Vec<Verse>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a verse. A verse with an existing key replaces the old record
    /// in its original position.
    pub fn insert(&mut self, verse: Verse) {
        match self.verses.iter_mut().find(|v| v.key == verse.key) {
            Some(existing) => *existing = verse,
            None => self.verses.push(verse),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Verse> {
        self.verses.iter().find(|v| v.key == key)
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Verse> {
        self.verses.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Verse> {
        self.verses.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.verses.iter().map(|v| v.key.as_str())
    }

    /// Number of verses that carry commentary
    pub fn annotated_count(&self) -> usize {
        self.verses.iter().filter(|v| v.has_commentary()).count()
    }
}

impl FromIterator<Verse> for Batch {
    fn from_iter<I: IntoIterator<Item = Verse>>(iter: I) -> Self {
        let mut batch = Batch::new();
        for verse in iter {
            batch.insert(verse);
        }
        batch
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Verse;
    type IntoIter = std::slice::Iter<'a, Verse>;

    fn into_iter(self) -> Self::IntoIter {
        self.verses.iter()
    }
}
