//! Shape description types.

use regex::Regex;

/// JSON type a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// JSON string.
    String,
    /// JSON number without a fractional part.
    Integer,
    /// Any JSON number.
    Number,
    /// JSON boolean.
    Boolean,
    /// JSON array of strings.
    StringArray,
}

impl FieldType {
    /// Description used in error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Number => "a number",
            Self::Boolean => "a boolean",
            Self::StringArray => "an array of strings",
        }
    }
}

/// A constraint checked after the type matches.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// String (or each array item) must match.
    Pattern(Regex),
    /// Character count bounds for strings.
    Length {
        /// Minimum characters.
        min: usize,
        /// Maximum characters.
        max: usize,
    },
    /// Numeric bounds.
    Range {
        /// Lower bound.
        min: Option<f64>,
        /// Upper bound (inclusive).
        max: Option<f64>,
        /// Lower bound is exclusive.
        exclusive_min: bool,
    },
    /// String must be one of these values.
    OneOf(&'static [&'static str]),
    /// String must be a real `YYYY-MM-DD` calendar date.
    Date,
    /// Array must have at least one item.
    NonEmpty,
}

/// One declared field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Parameter name.
    pub name: &'static str,
    /// Expected JSON type.
    pub field_type: FieldType,
    /// Must be present and non-null.
    pub required: bool,
    /// Constraints in evaluation order.
    pub constraints: Vec<Constraint>,
}

impl FieldRule {
    fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// Declare a string field.
    #[must_use]
    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    /// Declare an integer field.
    #[must_use]
    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    /// Declare a number field.
    #[must_use]
    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number)
    }

    /// Declare a boolean field.
    #[must_use]
    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Declare a string-array field.
    #[must_use]
    pub fn string_array(name: &'static str) -> Self {
        Self::new(name, FieldType::StringArray)
    }

    /// Mark the field required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Add a regex pattern.
    #[must_use]
    #[allow(clippy::expect_used)] // Patterns are compile-time constants; expect() is safe here
    pub fn pattern(mut self, pattern: &'static str) -> Self {
        let re = Regex::new(pattern).expect("schema pattern is valid");
        self.constraints.push(Constraint::Pattern(re));
        self
    }

    /// Bound the character count.
    #[must_use]
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.constraints.push(Constraint::Length { min, max });
        self
    }

    /// Inclusive numeric range.
    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.constraints.push(Constraint::Range {
            min: Some(min),
            max: Some(max),
            exclusive_min: false,
        });
        self
    }

    /// Inclusive lower bound only.
    #[must_use]
    pub fn at_least(mut self, min: f64) -> Self {
        self.constraints.push(Constraint::Range {
            min: Some(min),
            max: None,
            exclusive_min: false,
        });
        self
    }

    /// Strictly positive.
    #[must_use]
    pub fn positive(mut self) -> Self {
        self.constraints.push(Constraint::Range {
            min: Some(0.0),
            max: None,
            exclusive_min: true,
        });
        self
    }

    /// Restrict to an enumeration.
    #[must_use]
    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.constraints.push(Constraint::OneOf(values));
        self
    }

    /// Require a `YYYY-MM-DD` date.
    #[must_use]
    pub fn date(mut self) -> Self {
        self.constraints.push(Constraint::Date);
        self
    }

    /// Require a non-empty array.
    #[must_use]
    pub fn non_empty(mut self) -> Self {
        self.constraints.push(Constraint::NonEmpty);
        self
    }
}

/// How many members of a group may be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Exactly one member.
    ExactlyOne,
    /// Zero or one member.
    AtMostOne,
}

/// Alternative-key group.
#[derive(Debug, Clone)]
pub struct GroupRule {
    /// Cardinality rule.
    pub kind: GroupKind,
    /// Member field names.
    pub fields: Vec<&'static str>,
}

/// A named parameter shape.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Shape name.
    pub name: &'static str,
    /// Declared fields in evaluation order.
    pub fields: Vec<FieldRule>,
    /// Alternative groups in evaluation order.
    pub groups: Vec<GroupRule>,
}

impl Shape {
    /// Start an empty shape.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Declare a field.
    #[must_use]
    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Exactly one of `fields` must be supplied.
    #[must_use]
    pub fn exactly_one_of(mut self, fields: &[&'static str]) -> Self {
        self.groups.push(GroupRule {
            kind: GroupKind::ExactlyOne,
            fields: fields.to_vec(),
        });
        self
    }

    /// At most one of `fields` may be supplied.
    #[must_use]
    pub fn at_most_one_of(mut self, fields: &[&'static str]) -> Self {
        self.groups.push(GroupRule {
            kind: GroupKind::AtMostOne,
            fields: fields.to_vec(),
        });
        self
    }

    /// Names of the required fields in declaration order.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }
}
