use std::fmt;

/// The fully-qualified name of a type: path segments joined by `::`.
///
/// Enum variants live in their enum's namespace, so `Shape::Circle` is
/// *derived from* `Shape`: a type is derived from another when the other's
/// path is a prefix of its own. Every type is derived from itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName {
    segments: Vec<String>,
}

impl TypeName {
    /// Parses a `::`-separated path.
    ///
    /// Returns `None` if the path is empty or any segment is not a valid
    /// identifier (a letter or `_`, then letters, digits and `_`).
    ///
    /// # Example
    /// ```
    /// use fhll::interpreter::types::type_name::TypeName;
    ///
    /// assert!(TypeName::parse("Shape::Circle").is_some());
    /// assert!(TypeName::parse("Shape::9").is_none());
    /// assert!(TypeName::parse("").is_none());
    /// ```
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let segments = path.split("::").map(str::to_string).collect::<Vec<_>>();
        segments.iter()
                .all(|s| is_valid_segment(s))
                .then_some(Self { segments })
    }

    /// Builds a type name from segments the parser already validated.
    pub fn from_segments(segments: impl IntoIterator<Item = String>) -> Self {
        Self { segments: segments.into_iter().collect() }
    }

    /// A single-segment name, used for builtin and top-level types.
    #[must_use]
    pub fn simple(name: &str) -> Self {
        Self { segments: vec![name.to_string()] }
    }

    /// Returns this name with one more segment appended.
    ///
    /// # Example
    /// ```
    /// use fhll::interpreter::types::type_name::TypeName;
    ///
    /// let shape = TypeName::simple("Shape");
    /// assert_eq!(shape.extend("Circle").to_string(), "Shape::Circle");
    /// ```
    #[must_use]
    pub fn extend(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    /// Whether `base`'s path is a prefix of this one.
    ///
    /// # Example
    /// ```
    /// use fhll::interpreter::types::type_name::TypeName;
    ///
    /// let shape = TypeName::simple("Shape");
    /// let circle = shape.extend("Circle");
    ///
    /// assert!(circle.is_derived_from(&shape));
    /// assert!(circle.is_derived_from(&circle));
    /// assert!(!shape.is_derived_from(&circle));
    /// ```
    #[must_use]
    pub fn is_derived_from(&self, base: &Self) -> bool {
        self.segments.starts_with(&base.segments)
    }

    /// The last segment, i.e. the unqualified name.
    #[must_use]
    pub fn last(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// All segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("::"))
    }
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars.next()
         .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
