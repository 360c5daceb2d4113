// Player-name normalisation and name-keyed lookups.
//
// Stat providers, injury reports and league rosters spell names differently
// ("Nikola Jokić" vs "Nikola Jokic", "P.J. Washington" vs "PJ Washington").
// Every cross-source join in the engine goes through `normalize_name`.

use std::collections::HashMap;

/// Fold a Latin letter with a diacritic to its ASCII base letter.
/// Characters outside the table pass through unchanged.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => 'c',
        'Ç' | 'Ć' | 'Č' | 'Ĉ' | 'Ċ' => 'C',
        'ď' | 'đ' => 'd',
        'Ď' | 'Đ' => 'D',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'ğ' | 'ģ' => 'g',
        'Ğ' | 'Ģ' => 'G',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'Į' | 'İ' => 'I',
        'ķ' => 'k',
        'Ķ' => 'K',
        'ĺ' | 'ļ' | 'ľ' | 'ł' => 'l',
        'Ĺ' | 'Ļ' | 'Ľ' | 'Ł' => 'L',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ő' => 'O',
        'ŕ' | 'ř' => 'r',
        'Ŕ' | 'Ř' => 'R',
        'ś' | 'š' | 'ş' | 'ș' => 's',
        'Ś' | 'Š' | 'Ş' | 'Ș' => 'S',
        'ť' | 'ţ' | 'ț' => 't',
        'Ť' | 'Ţ' | 'Ț' => 'T',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' | 'Ű' | 'Ų' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' | 'Ÿ' => 'Y',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        other => other,
    }
}

/// Normalize a player name for matching across sources.
///
/// Folds diacritics, lowercases, drops `.` and `'`, turns `-` into a space
/// and collapses runs of whitespace.
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .chars()
        .map(fold_diacritic)
        .filter(|c| *c != '.' && *c != '\'' && *c != '’')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "last-name first-initial" key used when an exact normalised match fails.
fn fallback_key(normalized: &str) -> Option<String> {
    let parts: Vec<&str> = normalized.split(' ').collect();
    if parts.len() < 2 {
        return None;
    }
    let first_initial = parts[0].chars().next()?;
    let last = parts[parts.len() - 1];
    Some(format!("{last} {first_initial}"))
}

// ---------------------------------------------------------------------------
// NameIndex
// ---------------------------------------------------------------------------

/// Map keyed by normalised player name.
///
/// Lookups try the exact normalised name first, then fall back to
/// last name + first initial when that key identifies exactly one entry.
#[derive(Debug, Clone)]
pub struct NameIndex<T> {
    entries: HashMap<String, T>,
    fallback: HashMap<String, Vec<String>>,
}

impl<T> Default for NameIndex<T> {
    fn default() -> Self {
        NameIndex {
            entries: HashMap::new(),
            fallback: HashMap::new(),
        }
    }
}

impl<T> NameIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `name`. Returns the previous value.
    pub fn insert(&mut self, name: &str, value: T) -> Option<T> {
        let key = normalize_name(name);
        if !self.entries.contains_key(&key) {
            if let Some(fb) = fallback_key(&key) {
                self.fallback.entry(fb).or_default().push(key.clone());
            }
        }
        self.entries.insert(key, value)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        let key = normalize_name(name);
        if let Some(v) = self.entries.get(&key) {
            return Some(v);
        }
        let fb = fallback_key(&key)?;
        match self.fallback.get(&fb).map(Vec::as_slice) {
            Some([only]) => self.entries.get(only),
            _ => None,
        }
    }

    /// Mutable access by exact normalised name (no fallback).
    pub fn get_exact_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}

impl<S: AsRef<str>, T> FromIterator<(S, T)> for NameIndex<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut index = NameIndex::new();
        for (name, value) in iter {
            index.insert(name.as_ref(), value);
        }
        index
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
