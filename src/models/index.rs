//! Cross-file definition index: typed definitions, alias names, and bare
//! header identifiers, plus the pending reference records resolved against
//! them once the whole corpus has been scanned.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Section types whose headers declare a referenceable definition.
pub enum DefType {
    ItemDef,
    CharDef,
    Events,
    Function,
    RegionType,
    AreaDef,
    Dialog,
    Menu,
    RoomDef,
    Skill,
    SkillClass,
    SkillMenu,
    Spawn,
    Spell,
    TypeDef,
    Template,
}

impl DefType {
    pub const ALL: [DefType; 16] = [
        DefType::ItemDef,
        DefType::CharDef,
        DefType::Events,
        DefType::Function,
        DefType::RegionType,
        DefType::AreaDef,
        DefType::Dialog,
        DefType::Menu,
        DefType::RoomDef,
        DefType::Skill,
        DefType::SkillClass,
        DefType::SkillMenu,
        DefType::Spawn,
        DefType::Spell,
        DefType::TypeDef,
        DefType::Template,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefType::ItemDef => "ITEMDEF",
            DefType::CharDef => "CHARDEF",
            DefType::Events => "EVENTS",
            DefType::Function => "FUNCTION",
            DefType::RegionType => "REGIONTYPE",
            DefType::AreaDef => "AREADEF",
            DefType::Dialog => "DIALOG",
            DefType::Menu => "MENU",
            DefType::RoomDef => "ROOMDEF",
            DefType::Skill => "SKILL",
            DefType::SkillClass => "SKILLCLASS",
            DefType::SkillMenu => "SKILLMENU",
            DefType::Spawn => "SPAWN",
            DefType::Spell => "SPELL",
            DefType::TypeDef => "TYPEDEF",
            DefType::Template => "TEMPLATE",
        }
    }

    /// Look up a tracked type by section name (case-insensitive).
    pub fn from_section(name: &str) -> Option<DefType> {
        DefType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }

    /// Types whose naming directive also registers a typed definition.
    pub fn is_id_bearing(&self) -> bool {
        matches!(self, DefType::ItemDef | DefType::CharDef)
    }
}

impl fmt::Display for DefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// First-seen location of a definition or name.
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    pub fn new(file: &str, line: usize) -> Self {
        Location {
            file: file.to_string(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// `(type, id[, subtype])` with the id and subtype uppercased.
pub struct DefKey {
    pub def_type: DefType,
    pub id: String,
    pub subtype: Option<String>,
}

impl DefKey {
    pub fn new(def_type: DefType, id: &str) -> Self {
        DefKey {
            def_type,
            id: id.to_ascii_uppercase(),
            subtype: None,
        }
    }

    pub fn with_subtype(mut self, subtype: &str) -> Self {
        self.subtype = Some(subtype.to_ascii_uppercase());
        self
    }
}

impl fmt::Display for DefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.def_type, self.id)?;
        if let Some(sub) = &self.subtype {
            write!(f, " {}", sub)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A use of an identifier awaiting corpus-wide resolution.
pub struct ReferenceUse {
    pub file: String,
    pub line: usize,
    pub def_types: &'static [DefType],
    pub id: String,
}

impl ReferenceUse {
    /// Candidate types joined for messages, e.g. `REGIONTYPE/AREADEF`.
    pub fn type_label(&self) -> String {
        self.def_types
            .iter()
            .map(DefType::as_str)
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[derive(Debug, Default)]
/// The three tables shared by every per-file scan of one run.
pub struct DefIndex {
    definitions: HashMap<DefKey, Location>,
    aliases: HashMap<String, Location>,
    identifiers: HashMap<String, Location>,
}

impl DefIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `key` unless present. Returns the earlier location on a repeat.
    pub fn record_definition(&mut self, key: DefKey, loc: Location) -> Option<&Location> {
        use std::collections::hash_map::Entry;
        match self.definitions.entry(key) {
            Entry::Occupied(e) => Some(e.into_mut()),
            Entry::Vacant(v) => {
                v.insert(loc);
                None
            }
        }
    }

    /// Register a definition key only if absent; repeats are not duplicates.
    pub fn ensure_definition(&mut self, key: DefKey, loc: Location) {
        self.definitions.entry(key).or_insert(loc);
    }

    pub fn record_alias(&mut self, name: &str, loc: Location) {
        record_first(&mut self.aliases, name, loc);
    }

    pub fn record_identifier(&mut self, name: &str, loc: Location) {
        record_first(&mut self.identifiers, name, loc);
    }

    pub fn definition(&self, key: &DefKey) -> Option<&Location> {
        self.definitions.get(key)
    }

    pub fn alias(&self, name: &str) -> Option<&Location> {
        self.aliases.get(&name.to_ascii_uppercase())
    }

    pub fn identifier(&self, name: &str) -> Option<&Location> {
        self.identifiers.get(&name.to_ascii_uppercase())
    }

    /// A reference resolves through an alias, any declared header id, or a
    /// typed definition of one of its candidate types.
    pub fn resolves(&self, r: &ReferenceUse) -> bool {
        if self.alias(&r.id).is_some() || self.identifier(&r.id).is_some() {
            return true;
        }
        r.def_types
            .iter()
            .any(|t| self.definitions.contains_key(&DefKey::new(*t, &r.id)))
    }
}

fn record_first(table: &mut HashMap<String, Location>, name: &str, loc: Location) {
    let upper = name.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return;
    }
    table.entry(upper).or_insert(loc);
}
