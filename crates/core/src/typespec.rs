//! Type-spec names and the meta-type expansion.
//!
//! Schema fields name the type their value conforms to with strings such as
//! `"Entity Action Type"`, `"Item Stack"` or the category-agnostic
//! `"Condition Type"`. [`TypeSpec::parse`] turns such a name into a closed
//! set of dispatch targets; names it does not recognise become
//! [`TypeSpec::Data`] and are looked up in the data-rule registry.

use std::fmt;

/// The enclosing context a meta type is expanded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Entity,
    BiEntity,
    Block,
    Item,
    Damage,
    Biome,
    Fluid,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Entity,
        Category::BiEntity,
        Category::Block,
        Category::Item,
        Category::Damage,
        Category::Biome,
        Category::Fluid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Entity => "Entity",
            Category::BiEntity => "Bi-entity",
            Category::Block => "Block",
            Category::Item => "Item",
            Category::Damage => "Damage",
            Category::Biome => "Biome",
            Category::Fluid => "Fluid",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Only these categories have action types.
    pub fn has_actions(self) -> bool {
        matches!(
            self,
            Category::Entity | Category::BiEntity | Category::Block | Category::Item
        )
    }
}

/// Category-agnostic markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaKind {
    Action,
    Condition,
}

impl MetaKind {
    /// The marker as it appears in schema fields.
    pub fn marker(self) -> &'static str {
        match self {
            MetaKind::Action => "Action Type",
            MetaKind::Condition => "Condition Type",
        }
    }

    pub fn family(self, category: Category) -> Family {
        match self {
            MetaKind::Action => Family::Action(category),
            MetaKind::Condition => Family::Condition(category),
        }
    }
}

/// A concrete family of typed fragments, each carrying a `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Power,
    Action(Category),
    Condition(Category),
}

impl Family {
    /// The meta table this family shares, and the category meta shapes are
    /// walked with.
    pub fn meta(self) -> Option<(MetaKind, Category)> {
        match self {
            Family::Power => None,
            Family::Action(c) => Some((MetaKind::Action, c)),
            Family::Condition(c) => Some((MetaKind::Condition, c)),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Power => f.write_str("Power Type"),
            Family::Action(c) => write!(f, "{} Action Type", c.label()),
            Family::Condition(c) => write!(f, "{} Condition Type", c.label()),
        }
    }
}

/// Names a schema table, and the table a typed rule is registered against.
///
/// `Data` holds the shapes of untagged data types; it is keyed by type-spec
/// name rather than by tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableId {
    Family(Family),
    Meta(MetaKind),
    Data,
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableId::Family(family) => family.fmt(f),
            TableId::Meta(kind) => write!(f, "Meta {}", kind.marker()),
            TableId::Data => f.write_str("Data Type"),
        }
    }
}

/// A parsed type-spec name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    Family(Family),
    Meta(MetaKind),
    Data(String),
}

impl TypeSpec {
    pub fn parse(name: &str) -> TypeSpec {
        if name == "Power Type" {
            return TypeSpec::Family(Family::Power);
        }
        for kind in [MetaKind::Action, MetaKind::Condition] {
            if name == kind.marker() {
                return TypeSpec::Meta(kind);
            }
            let family = name
                .strip_suffix(kind.marker())
                .and_then(|rest| rest.strip_suffix(' '))
                .and_then(Category::from_label);
            if let Some(category) = family {
                if kind == MetaKind::Condition || category.has_actions() {
                    return TypeSpec::Family(kind.family(category));
                }
            }
        }
        TypeSpec::Data(name.to_string())
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Family(family) => family.fmt(f),
            TypeSpec::Meta(kind) => f.write_str(kind.marker()),
            TypeSpec::Data(name) => f.write_str(name),
        }
    }
}

/// Expand a meta marker against its enclosing category.
///
/// Total and non-recursive: the result is always a concrete family.
pub fn expand_meta(kind: MetaKind, category: Category) -> Family {
    kind.family(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_family_name_it_prints() {
        let mut families = vec![Family::Power];
        for c in Category::ALL {
            families.push(Family::Condition(c));
            if c.has_actions() {
                families.push(Family::Action(c));
            }
        }
        for family in families {
            assert_eq!(TypeSpec::parse(&family.to_string()), TypeSpec::Family(family));
        }
    }

    #[test]
    fn markers_parse_as_meta() {
        assert_eq!(TypeSpec::parse("Action Type"), TypeSpec::Meta(MetaKind::Action));
        assert_eq!(
            TypeSpec::parse("Condition Type"),
            TypeSpec::Meta(MetaKind::Condition)
        );
    }

    #[test]
    fn categories_without_actions_fall_through_to_data() {
        assert_eq!(
            TypeSpec::parse("Damage Action Type"),
            TypeSpec::Data("Damage Action Type".to_string())
        );
        assert_eq!(
            TypeSpec::parse("Item Stack"),
            TypeSpec::Data("Item Stack".to_string())
        );
        assert_eq!(
            TypeSpec::parse("EntityAction Type"),
            TypeSpec::Data("EntityAction Type".to_string())
        );
    }

    #[test]
    fn meta_expansion_yields_the_concrete_family() {
        let family = expand_meta(MetaKind::Action, Category::Entity);
        assert_eq!(family.to_string(), "Entity Action Type");
        assert_eq!(
            expand_meta(MetaKind::Condition, Category::BiEntity).to_string(),
            "Bi-entity Condition Type"
        );
        assert!(!matches!(
            TypeSpec::parse(&family.to_string()),
            TypeSpec::Meta(_)
        ));
    }

    #[test]
    fn table_names() {
        assert_eq!(TableId::Meta(MetaKind::Action).to_string(), "Meta Action Type");
        assert_eq!(TableId::Data.to_string(), "Data Type");
        assert_eq!(
            TableId::Family(Family::Condition(Category::Biome)).to_string(),
            "Biome Condition Type"
        );
    }
}
