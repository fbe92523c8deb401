//! Query abstract syntax tree.
//!
//! Every node can be serialized back to query syntax and evaluated against a
//! [`QueryMatcher`]. Nodes are immutable once built; parents own their
//! children outright.

use std::fmt::{self, Write};

use log::debug;

use crate::matcher::{EQUALS, FieldTarget, QueryMatcher};

/// A single search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextQuery {
    /// The term as written, without quotes.
    text: String,
    /// True if the term was quoted.
    is_exact_match: bool,
}

impl TextQuery {
    /// Creates a term.
    pub fn new(text: impl Into<String>, is_exact_match: bool) -> Self {
        Self {
            text: text.into(),
            is_exact_match,
        }
    }

    /// Creates an unquoted term.
    pub fn term(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// Creates a quoted term.
    pub fn exact(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// The term text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the term must be matched literally.
    pub fn is_exact_match(&self) -> bool {
        self.is_exact_match
    }

    /// Matches the term against any field with equality semantics.
    ///
    /// Exactness travels with `self`; interpreting it is up to the matcher.
    pub fn matches<M: QueryMatcher + ?Sized>(&self, matcher: &M) -> Result<bool, M::Error> {
        matcher.match_field(FieldTarget::Any, EQUALS, self)
    }

    /// Writes the query syntax for this term.
    fn write_query<W: Write>(&self, out: &mut W, debug: bool) -> fmt::Result {
        if self.is_exact_match {
            write!(out, "\"{}\"", self.text)
        } else if debug {
            write!(out, "<{}>", self.text)
        } else {
            out.write_str(&self.text)
        }
    }
}

impl fmt::Display for TextQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_query(f, f.alternate())
    }
}

/// A quoted sequence of words.
///
/// Evaluates as one exact term over the joined text; the individual words only
/// shape the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhraseQuery {
    /// The words joined by single spaces, always exact.
    text: TextQuery,
    /// The individual words.
    children: Vec<TextQuery>,
}

impl PhraseQuery {
    /// Creates a phrase from its words.
    pub fn new(children: Vec<TextQuery>) -> Self {
        let joined = children
            .iter()
            .map(TextQuery::text)
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text: TextQuery::exact(joined),
            children,
        }
    }

    /// The joined phrase text.
    pub fn text(&self) -> &str {
        self.text.text()
    }

    /// The phrase as a single exact term.
    pub fn as_text_query(&self) -> &TextQuery {
        &self.text
    }

    /// The words of the phrase.
    pub fn children(&self) -> &[TextQuery] {
        &self.children
    }

    /// Writes the phrase: words joined by spaces inside one pair of quotes.
    fn write_query<W: Write>(&self, out: &mut W, debug: bool) -> fmt::Result {
        out.write_char('"')?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                out.write_char(' ')?;
            }
            child.write_query(out, debug)?;
        }
        out.write_char('"')
    }
}

/// Restricts matching of a sub-query to one named field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldScope {
    /// Field name.
    field: String,
    /// Query evaluated within the field.
    child: Box<Query>,
}

impl FieldScope {
    /// Creates a field scope.
    pub fn new(field: impl Into<String>, child: Query) -> Self {
        Self {
            field: field.into(),
            child: Box::new(child),
        }
    }

    /// The field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The scoped query.
    pub fn child(&self) -> &Query {
        &self.child
    }

    /// Evaluates the child against a matcher narrowed to the field.
    ///
    /// A field the matcher does not know never matches.
    pub fn matches<M: QueryMatcher + ?Sized>(&self, matcher: &M) -> Result<bool, M::Error> {
        match matcher.field_matcher(&self.field)? {
            Some(scoped) => self.child.matches(&*scoped),
            None => {
                debug!("no matcher for field '{}', scope does not match", self.field);
                Ok(false)
            }
        }
    }
}

/// Compares a field against a value, e.g. `price>=10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldCompareQuery {
    /// Field name.
    field: String,
    /// Comparison operator (`=`, `<`, `>`, `<=`, `>=`). Not validated here.
    operator: String,
    /// Value to compare with.
    text: TextQuery,
}

impl FieldCompareQuery {
    /// Creates a comparison.
    pub fn new(field: impl Into<String>, operator: impl Into<String>, text: TextQuery) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            text,
        }
    }

    /// The field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The comparison operator.
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// The value compared against.
    pub fn text(&self) -> &TextQuery {
        &self.text
    }

    /// Delegates the comparison to the matcher.
    pub fn matches<M: QueryMatcher + ?Sized>(&self, matcher: &M) -> Result<bool, M::Error> {
        matcher.match_field(FieldTarget::Named(&self.field), &self.operator, &self.text)
    }

    /// Writes `field` `operator` `value` with no separators.
    fn write_query<W: Write>(&self, out: &mut W, debug: bool) -> fmt::Result {
        if debug {
            out.write_char('<')?;
        }
        write!(out, "{}{}", self.field, self.operator)?;
        self.text.write_query(out, false)?;
        if debug {
            out.write_char('>')?;
        }
        Ok(())
    }
}

/// A range between two bounds, each inclusive or exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeQuery {
    /// Lower bound.
    start: TextQuery,
    /// Whether the lower bound is included.
    start_inclusive: bool,
    /// Upper bound.
    end: TextQuery,
    /// Whether the upper bound is included.
    end_inclusive: bool,
}

impl RangeQuery {
    /// Creates a range. Bounds are not checked for ordering.
    pub fn new(start: TextQuery, start_inclusive: bool, end: TextQuery, end_inclusive: bool) -> Self {
        Self {
            start,
            start_inclusive,
            end,
            end_inclusive,
        }
    }

    /// The lower bound.
    pub fn start(&self) -> &TextQuery {
        &self.start
    }

    /// Whether the lower bound is included.
    pub fn start_inclusive(&self) -> bool {
        self.start_inclusive
    }

    /// The upper bound.
    pub fn end(&self) -> &TextQuery {
        &self.end
    }

    /// Whether the upper bound is included.
    pub fn end_inclusive(&self) -> bool {
        self.end_inclusive
    }

    /// Delegates the range test to the matcher.
    pub fn matches<M: QueryMatcher + ?Sized>(&self, matcher: &M) -> Result<bool, M::Error> {
        matcher.match_range(
            &self.start,
            self.start_inclusive,
            &self.end,
            self.end_inclusive,
        )
    }

    /// Writes `[a TO b]`, with the bracket at each end flipped when exclusive.
    fn write_query<W: Write>(&self, out: &mut W, debug: bool) -> fmt::Result {
        if debug {
            out.write_char('<')?;
        }
        out.write_char(if self.start_inclusive { '[' } else { ']' })?;
        self.start.write_query(out, false)?;
        out.write_str(" TO ")?;
        self.end.write_query(out, false)?;
        out.write_char(if self.end_inclusive { ']' } else { '[' })?;
        if debug {
            out.write_char('>')?;
        }
        Ok(())
    }
}

/// A node in the query tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// A single term, quoted or not.
    Text(TextQuery),

    /// A quoted multi-word phrase.
    Phrase(PhraseQuery),

    /// A sub-query restricted to one field.
    Field(FieldScope),

    /// A field comparison such as `year>2001`.
    Compare(FieldCompareQuery),

    /// A range such as `[a TO b]`.
    Range(RangeQuery),

    /// Negation: matches when the child does not.
    Not(Box<Self>),

    /// Explicit parentheses. Matches exactly like the child.
    Group(Box<Self>),

    /// Conjunction: every child must match.
    And(Vec<Self>),

    /// Disjunction: at least one child must match.
    Or(Vec<Self>),
}

impl Query {
    /// Creates an unquoted term.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextQuery::term(text))
    }

    /// Creates a quoted term.
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Text(TextQuery::exact(text))
    }

    /// Creates a phrase from its words.
    pub fn phrase<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Phrase(PhraseQuery::new(
            words.into_iter().map(TextQuery::term).collect(),
        ))
    }

    /// Creates a field scope.
    pub fn field(field: impl Into<String>, child: Self) -> Self {
        Self::Field(FieldScope::new(field, child))
    }

    /// Creates a field comparison.
    pub fn compare(field: impl Into<String>, operator: impl Into<String>, text: TextQuery) -> Self {
        Self::Compare(FieldCompareQuery::new(field, operator, text))
    }

    /// Creates a range.
    pub fn range(start: TextQuery, start_inclusive: bool, end: TextQuery, end_inclusive: bool) -> Self {
        Self::Range(RangeQuery::new(start, start_inclusive, end, end_inclusive))
    }

    /// Creates a negation.
    pub fn not(child: Self) -> Self {
        Self::Not(Box::new(child))
    }

    /// Wraps a query in parentheses.
    pub fn group(child: Self) -> Self {
        Self::Group(Box::new(child))
    }

    /// Creates a conjunction. A single child is returned as is.
    pub fn and(mut children: Vec<Self>) -> Self {
        if children.len() == 1
            && let Some(only) = children.pop()
        {
            return only;
        }
        Self::And(children)
    }

    /// Creates a disjunction. A single child is returned as is.
    pub fn or(mut children: Vec<Self>) -> Self {
        if children.len() == 1
            && let Some(only) = children.pop()
        {
            return only;
        }
        Self::Or(children)
    }

    /// Short name of the node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Phrase(_) => "Phrase",
            Self::Field(_) => "Field",
            Self::Compare(_) => "Compare",
            Self::Range(_) => "Range",
            Self::Not(_) => "Not",
            Self::Group(_) => "Group",
            Self::And(_) => "And",
            Self::Or(_) => "Or",
        }
    }

    /// Evaluates the query against a matcher.
    ///
    /// AND and OR evaluate children left to right and stop as soon as the
    /// outcome is known. Errors from the matcher are returned untouched.
    pub fn matches<M: QueryMatcher + ?Sized>(&self, matcher: &M) -> Result<bool, M::Error> {
        match self {
            Self::Text(text) => text.matches(matcher),
            Self::Phrase(phrase) => phrase.as_text_query().matches(matcher),
            Self::Field(scope) => scope.matches(matcher),
            Self::Compare(compare) => compare.matches(matcher),
            Self::Range(range) => range.matches(matcher),
            Self::Not(child) => Ok(!child.matches(matcher)?),
            Self::Group(child) => child.matches(matcher),
            Self::And(children) => {
                for child in children {
                    if !child.matches(matcher)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Or(children) => {
                for child in children {
                    if child.matches(matcher)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Serializes the query.
    ///
    /// With `debug` set, unquoted terms, comparisons and ranges are wrapped in
    /// `<...>` so node boundaries are visible.
    pub fn serialize(&self, debug: bool) -> String {
        if debug {
            format!("{self:#}")
        } else {
            self.to_string()
        }
    }

    /// Formats the query as canonical query syntax.
    pub fn to_query_string(&self) -> String {
        self.serialize(false)
    }

    /// Formats the query with debug delimiters.
    pub fn to_debug_string(&self) -> String {
        self.serialize(true)
    }

    /// Returns a displayable indented tree of the node kinds.
    pub fn tree(&self) -> QueryTree<'_> {
        QueryTree(self)
    }

    /// Writes query syntax for this node and its descendants.
    fn write_query<W: Write>(&self, out: &mut W, debug: bool) -> fmt::Result {
        match self {
            Self::Text(text) => text.write_query(out, debug),
            Self::Phrase(phrase) => phrase.write_query(out, debug),
            Self::Field(scope) => {
                write!(out, "{}:", scope.field)?;
                scope.child.write_query(out, debug)
            }
            Self::Compare(compare) => compare.write_query(out, debug),
            Self::Range(range) => range.write_query(out, debug),
            Self::Not(child) => {
                out.write_char('-')?;
                child.write_query(out, debug)
            }
            Self::Group(child) => {
                out.write_char('(')?;
                child.write_query(out, debug)?;
                out.write_char(')')
            }
            Self::And(children) => write_joined(out, children, " ", debug),
            Self::Or(children) => write_joined(out, children, " OR ", debug),
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Text(text) if text.is_exact_match => writeln!(f, "{prefix}Exact({:?})", text.text),
            Self::Text(text) => writeln!(f, "{prefix}Text({:?})", text.text),
            Self::Phrase(phrase) => {
                let words: Vec<&str> = phrase.children.iter().map(TextQuery::text).collect();
                writeln!(f, "{prefix}Phrase({words:?})")
            }
            Self::Field(scope) => {
                writeln!(f, "{prefix}Field({:?})", scope.field)?;
                scope.child.fmt_tree(f, indent + 1)
            }
            Self::Compare(compare) => writeln!(
                f,
                "{prefix}Compare({:?} {} {})",
                compare.field, compare.operator, compare.text
            ),
            Self::Range(range) => {
                write!(f, "{prefix}Range(")?;
                range.write_query(f, false)?;
                writeln!(f, ")")
            }
            Self::Not(child) | Self::Group(child) => {
                writeln!(f, "{prefix}{}", self.kind())?;
                child.fmt_tree(f, indent + 1)
            }
            Self::And(children) | Self::Or(children) => {
                writeln!(f, "{prefix}{}", self.kind())?;
                for child in children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Writes children separated by `separator`, wrapped in parentheses.
fn write_joined<W: Write>(out: &mut W, children: &[Query], separator: &str, debug: bool) -> fmt::Result {
    out.write_char('(')?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            out.write_str(separator)?;
        }
        child.write_query(out, debug)?;
    }
    out.write_char(')')
}

impl fmt::Display for Query {
    /// Writes query syntax; the alternate flag (`{:#}`) selects the debug form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_query(f, f.alternate())
    }
}

/// Indented tree rendering of a [`Query`], one node per line.
#[derive(Debug, Clone, Copy)]
pub struct QueryTree<'a>(&'a Query);

impl fmt::Display for QueryTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, thread};

    use super::*;
    use crate::matcher::ScopedMatcher;

    /// Error raised by [`Scripted`] for terms listed in `explode`.
    #[derive(Debug, PartialEq)]
    struct Boom(String);

    /// Matcher with canned answers that records every call it receives.
    #[derive(Clone, Default)]
    struct Scripted {
        hits: Vec<&'static str>,
        explode: Vec<&'static str>,
        fields: Vec<&'static str>,
        range_hit: bool,
        scope: Option<&'static str>,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Scripted {
        fn hitting(hits: &[&'static str]) -> Self {
            Self {
                hits: hits.to_vec(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl QueryMatcher for Scripted {
        type Error = Boom;

        fn match_field(
            &self,
            field: FieldTarget<'_>,
            operator: &str,
            value: &TextQuery,
        ) -> Result<bool, Boom> {
            let field = field.name().or(self.scope).unwrap_or("*");
            self.log
                .borrow_mut()
                .push(format!("{field}{operator}{}", value.text()));
            if self.explode.iter().any(|e| *e == value.text()) {
                return Err(Boom(value.text().to_string()));
            }
            Ok(self.hits.iter().any(|h| *h == value.text()))
        }

        fn match_range(
            &self,
            start: &TextQuery,
            start_inclusive: bool,
            end: &TextQuery,
            end_inclusive: bool,
        ) -> Result<bool, Boom> {
            self.log.borrow_mut().push(format!(
                "range {} {start_inclusive} {} {end_inclusive}",
                start.text(),
                end.text()
            ));
            Ok(self.range_hit)
        }

        fn field_matcher(&self, field: &str) -> Result<Option<ScopedMatcher<'_, Boom>>, Boom> {
            Ok(self.fields.iter().find(|f| **f == field).map(|f| {
                Box::new(Self {
                    scope: Some(*f),
                    ..self.clone()
                }) as ScopedMatcher<'_, Boom>
            }))
        }
    }

    fn t(s: &str) -> Query {
        Query::text(s)
    }

    #[test]
    fn text_serializes_raw() {
        assert_eq!(t("rust").to_query_string(), "rust");
        assert_eq!(Query::exact("rust lang").to_query_string(), "\"rust lang\"");
    }

    #[test]
    fn phrase_quotes_once() {
        let phrase = Query::phrase(["error", "handling"]);
        assert_eq!(phrase.to_query_string(), "\"error handling\"");
        let Query::Phrase(inner) = &phrase else {
            panic!("expected phrase");
        };
        assert_eq!(inner.text(), "error handling");
        assert!(inner.as_text_query().is_exact_match());
        assert_eq!(inner.children().len(), 2);
    }

    #[test]
    fn field_scope_serializes_with_colon() {
        assert_eq!(Query::field("title", t("guide")).to_query_string(), "title:guide");
        assert_eq!(
            Query::field("title", Query::phrase(["getting", "started"])).to_query_string(),
            "title:\"getting started\""
        );
    }

    #[test]
    fn compare_has_no_separators() {
        let q = Query::compare("price", ">=", TextQuery::term("10"));
        assert_eq!(q.to_query_string(), "price>=10");
        let q = Query::compare("name", "=", TextQuery::exact("Ada L"));
        assert_eq!(q.to_query_string(), "name=\"Ada L\"");
    }

    #[test]
    fn range_bracket_convention() {
        let a = TextQuery::term("a");
        let b = TextQuery::term("b");
        assert_eq!(
            Query::range(a.clone(), true, b.clone(), true).to_query_string(),
            "[a TO b]"
        );
        assert_eq!(
            Query::range(a.clone(), false, b.clone(), false).to_query_string(),
            "]a TO b["
        );
        assert_eq!(
            Query::range(a.clone(), true, b.clone(), false).to_query_string(),
            "[a TO b["
        );
        assert_eq!(Query::range(a, false, b, true).to_query_string(), "]a TO b]");
    }

    #[test]
    fn not_group_and_or_serialize() {
        assert_eq!(Query::not(t("x")).to_query_string(), "-x");
        assert_eq!(Query::group(t("x")).to_query_string(), "(x)");
        assert_eq!(Query::And(vec![t("a"), t("b")]).to_query_string(), "(a b)");
        assert_eq!(
            Query::Or(vec![t("a"), t("b"), t("c")]).to_query_string(),
            "(a OR b OR c)"
        );
        assert_eq!(Query::And(vec![]).to_query_string(), "()");
    }

    #[test]
    fn nested_precedence_is_explicit() {
        let q = Query::Or(vec![
            Query::And(vec![t("a"), Query::not(t("b"))]),
            Query::field("title", Query::Or(vec![t("c"), t("d")])),
        ]);
        assert_eq!(q.to_query_string(), "((a -b) OR title:(c OR d))");
    }

    #[test]
    fn debug_wraps_leaves_only() {
        assert_eq!(t("x").to_debug_string(), "<x>");
        assert_eq!(Query::And(vec![t("x")]).to_debug_string(), "(<x>)");
        assert_eq!(Query::exact("x").to_debug_string(), "\"x\"");
        assert_eq!(
            Query::compare("year", ">", TextQuery::term("2001")).to_debug_string(),
            "<year>2001>"
        );
        assert_eq!(
            Query::range(TextQuery::term("a"), true, TextQuery::term("b"), false).to_debug_string(),
            "<[a TO b[>"
        );
        assert_eq!(
            Query::not(Query::field("title", t("x"))).to_debug_string(),
            "-title:<x>"
        );
        assert_eq!(Query::phrase(["a", "b"]).to_debug_string(), "\"<a> <b>\"");
    }

    #[test]
    fn display_alternate_is_debug_form() {
        let q = Query::Or(vec![t("a"), t("b")]);
        assert_eq!(format!("{q}"), "(a OR b)");
        assert_eq!(format!("{q:#}"), "(<a> OR <b>)");
        assert_eq!(q.serialize(true), q.to_debug_string());
    }

    #[test]
    fn group_changes_serialization_only() {
        let inner = Query::And(vec![t("a"), t("b")]);
        let grouped = Query::group(inner.clone());
        assert_ne!(grouped.to_query_string(), inner.to_query_string());
        assert_eq!(grouped.to_query_string(), format!("({inner})"));

        for hits in [&["a", "b"][..], &["a"][..], &[][..]] {
            let m = Scripted::hitting(hits);
            assert_eq!(grouped.matches(&m), inner.matches(&m));
        }
    }

    #[test]
    fn text_matches_any_field_with_equality() {
        let m = Scripted::hitting(&["rust"]);
        assert_eq!(t("rust").matches(&m), Ok(true));
        assert_eq!(t("go").matches(&m), Ok(false));
        assert_eq!(m.calls(), vec!["*=rust", "*=go"]);
    }

    #[test]
    fn phrase_matches_as_joined_text() {
        let m = Scripted::hitting(&["error handling"]);
        assert_eq!(Query::phrase(["error", "handling"]).matches(&m), Ok(true));
        assert_eq!(m.calls(), vec!["*=error handling"]);
    }

    #[test]
    fn compare_and_range_delegate() {
        let m = Scripted {
            hits: vec!["10"],
            range_hit: true,
            ..Scripted::default()
        };
        let compare = Query::compare("price", "<=", TextQuery::term("10"));
        assert_eq!(compare.matches(&m), Ok(true));
        let range = Query::range(TextQuery::term("1"), false, TextQuery::term("5"), true);
        assert_eq!(range.matches(&m), Ok(true));
        assert_eq!(m.calls(), vec!["price<=10", "range 1 false 5 true"]);
    }

    #[test]
    fn field_scope_narrows_matcher() {
        let m = Scripted {
            hits: vec!["guide"],
            fields: vec!["title"],
            ..Scripted::default()
        };
        assert_eq!(Query::field("title", t("guide")).matches(&m), Ok(true));
        assert_eq!(m.calls(), vec!["title=guide"]);
    }

    #[test]
    fn field_scope_unknown_field_fails() {
        let m = Scripted {
            hits: vec!["guide"],
            explode: vec!["boom"],
            ..Scripted::default()
        };
        assert_eq!(Query::field("missing", t("guide")).matches(&m), Ok(false));
        assert_eq!(Query::field("missing", t("boom")).matches(&m), Ok(false));
        assert!(m.calls().is_empty());
    }

    #[test]
    fn not_negates() {
        for hits in [&["x"][..], &[][..]] {
            let m = Scripted::hitting(hits);
            let plain = t("x").matches(&m).unwrap();
            assert_eq!(Query::not(t("x")).matches(&m), Ok(!plain));
        }
        let m = Scripted::hitting(&[]);
        assert_eq!(Query::not(Query::not(t("x"))).matches(&m), Ok(false));
    }

    #[test]
    fn and_short_circuits_on_first_failure() {
        let m = Scripted {
            explode: vec!["b"],
            ..Scripted::default()
        };
        let q = Query::And(vec![t("a"), t("b")]);
        assert_eq!(q.matches(&m), Ok(false));
        assert_eq!(m.calls(), vec!["*=a"]);
    }

    #[test]
    fn or_short_circuits_on_first_success() {
        let m = Scripted {
            hits: vec!["a"],
            explode: vec!["b"],
            ..Scripted::default()
        };
        let q = Query::Or(vec![t("a"), t("b")]);
        assert_eq!(q.matches(&m), Ok(true));
        assert_eq!(m.calls(), vec!["*=a"]);
    }

    #[test]
    fn empty_and_or() {
        let m = Scripted::default();
        assert_eq!(Query::And(vec![]).matches(&m), Ok(true));
        assert_eq!(Query::Or(vec![]).matches(&m), Ok(false));
        assert!(m.calls().is_empty());
    }

    #[test]
    fn matcher_errors_propagate_unchanged() {
        let m = Scripted {
            hits: vec!["a"],
            explode: vec!["b"],
            fields: vec!["title"],
            ..Scripted::default()
        };
        let q = Query::And(vec![
            t("a"),
            Query::not(Query::field("title", Query::group(t("b")))),
        ]);
        assert_eq!(q.matches(&m), Err(Boom("b".into())));
    }

    #[test]
    fn and_or_constructors_unwrap_single() {
        assert_eq!(Query::and(vec![t("a")]), t("a"));
        assert_eq!(Query::or(vec![t("a")]), t("a"));
        assert_eq!(Query::and(vec![]), Query::And(vec![]));
        assert_eq!(
            Query::or(vec![t("a"), t("b")]),
            Query::Or(vec![t("a"), t("b")])
        );
    }

    #[test]
    fn tree_rendering() {
        let q = Query::And(vec![
            Query::field("title", Query::exact("guide")),
            Query::not(t("old")),
        ]);
        assert_eq!(
            q.tree().to_string(),
            "And\n  Field(\"title\")\n    Exact(\"guide\")\n  Not\n    Text(\"old\")\n"
        );
    }

    #[test]
    fn trees_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Query>();

        let q = Query::Or(vec![t("a"), Query::field("title", t("b"))]);
        thread::scope(|s| {
            for hit in ["a", "z"] {
                let q = &q;
                s.spawn(move || {
                    let m = Scripted::hitting(&[hit]);
                    assert_eq!(q.matches(&m), Ok(hit == "a"));
                });
            }
        });
    }
}
