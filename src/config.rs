use crate::interpreter::lexer::LexerConfig;

/// Limits applied while reading and running a program.
///
/// # Example
/// ```
/// use fhll::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.max_recursion_depth, 128);
/// assert_eq!(config.lexer.max_identifier_len, 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Limits enforced by the lexer.
    pub lexer:               LexerConfig,
    /// Deepest chain of nested calls a run may reach, the entry function
    /// included.
    pub max_recursion_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { lexer:               LexerConfig::default(),
               max_recursion_depth: 128, }
    }
}
