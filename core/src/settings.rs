//! Render settings.
//!
//! [`Settings`] is an explicit value passed to every render call. There is no
//! process-wide configuration: two contexts with different settings can render
//! the same tree concurrently.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier quoting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RenderQuotedNames {
    /// Quote every identifier
    Always,
    /// Never quote identifiers
    Never,
    /// Quote unless the name was created explicitly unquoted
    #[default]
    ExplicitDefaultQuoted,
    /// Quote only names created explicitly quoted
    ExplicitDefaultUnquoted,
}

/// Case applied to SQL keywords. Identifiers are never affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RenderKeywordCase {
    Upper,
    Lower,
    /// Keywords as written by the renderer (lower case)
    #[default]
    AsIs,
}

/// Bind marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ParamType {
    /// `?`
    #[default]
    Indexed,
    /// `:name`, or `:n` for unnamed parameters
    Named,
    /// `:name` for named parameters, inline literals for the rest
    NamedOrInlined,
    /// Every value inlined as a literal
    Inlined,
    /// Dialect numbered markers such as `$1` or `?1`
    Numbered,
}

/// Statement kind the rendered SQL is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StatementType {
    #[default]
    PreparedStatement,
    /// Static statements cannot carry binds; all values are inlined
    StaticStatement,
}

/// Options recognised by the renderer.
///
/// ```
/// use quill_core::settings::{ParamType, RenderKeywordCase, Settings};
///
/// let settings = Settings::new()
///     .with_render_keyword_case(RenderKeywordCase::Upper)
///     .with_param_type(ParamType::Named);
/// assert_eq!(settings.param_type, ParamType::Named);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    pub render_quoted_names: RenderQuotedNames,
    pub render_keyword_case: RenderKeywordCase,
    pub param_type: ParamType,
    pub statement_type: StatementType,
    /// Pad IN lists of bind values to the next power of `in_list_pad_base`
    pub in_list_padding: bool,
    pub in_list_pad_base: u32,
    /// Emit tracing events for rendered statements
    pub execute_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_quoted_names: RenderQuotedNames::default(),
            render_keyword_case: RenderKeywordCase::default(),
            param_type: ParamType::default(),
            statement_type: StatementType::default(),
            in_list_padding: false,
            in_list_pad_base: 2,
            execute_logging: true,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_render_quoted_names(mut self, value: RenderQuotedNames) -> Self {
        self.render_quoted_names = value;
        self
    }

    #[must_use]
    pub fn with_render_keyword_case(mut self, value: RenderKeywordCase) -> Self {
        self.render_keyword_case = value;
        self
    }

    #[must_use]
    pub fn with_param_type(mut self, value: ParamType) -> Self {
        self.param_type = value;
        self
    }

    #[must_use]
    pub fn with_statement_type(mut self, value: StatementType) -> Self {
        self.statement_type = value;
        self
    }

    #[must_use]
    pub fn with_in_list_padding(mut self, value: bool) -> Self {
        self.in_list_padding = value;
        self
    }

    #[must_use]
    pub fn with_in_list_pad_base(mut self, value: u32) -> Self {
        self.in_list_pad_base = value;
        self
    }

    #[must_use]
    pub fn with_execute_logging(mut self, value: bool) -> Self {
        self.execute_logging = value;
        self
    }

    /// Whether values default to inline literals rather than bind markers.
    #[must_use]
    pub fn inline_all(&self) -> bool {
        self.param_type == ParamType::Inlined
            || self.statement_type == StatementType::StaticStatement
    }

    /// Check settings that the type system cannot rule out.
    pub fn validate(&self) -> crate::Result<()> {
        if self.in_list_pad_base < 2 {
            return Err(crate::QuillError::Config(format!(
                "in_list_pad_base must be at least 2, got {}",
                self.in_list_pad_base
            )));
        }
        Ok(())
    }

    /// Parse settings from a TOML document. Missing keys take their defaults.
    ///
    /// ```
    /// use quill_core::settings::{RenderKeywordCase, Settings};
    ///
    /// let settings = Settings::from_toml_str(r#"render_keyword_case = "UPPER""#).unwrap();
    /// assert_eq!(settings.render_keyword_case, RenderKeywordCase::Upper);
    /// ```
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> crate::Result<Self> {
        let settings: Self =
            toml::from_str(s).map_err(|e| crate::QuillError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.param_type, ParamType::Indexed);
        assert_eq!(
            settings.render_quoted_names,
            RenderQuotedNames::ExplicitDefaultQuoted
        );
        assert!(!settings.inline_all());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn static_statements_inline() {
        let settings = Settings::new().with_statement_type(StatementType::StaticStatement);
        assert!(settings.inline_all());
    }

    #[test]
    fn rejects_small_pad_base() {
        let settings = Settings::new().with_in_list_pad_base(1);
        assert!(matches!(
            settings.validate(),
            Err(crate::QuillError::Config(_))
        ));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parses_toml() {
        let settings = Settings::from_toml_str(
            r#"
            render_quoted_names = "NEVER"
            param_type = "NAMED_OR_INLINED"
            in_list_padding = true
            in_list_pad_base = 4
            "#,
        )
        .unwrap();
        assert_eq!(settings.render_quoted_names, RenderQuotedNames::Never);
        assert_eq!(settings.param_type, ParamType::NamedOrInlined);
        assert!(settings.in_list_padding);
        assert_eq!(settings.in_list_pad_base, 4);
        assert!(settings.execute_logging);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_errors_are_config_errors() {
        let err = Settings::from_toml_str("param_type = \"SOMETIMES\"").unwrap_err();
        assert!(matches!(err, crate::QuillError::Config(_)));
    }
}
