//! Rendering options and configuration.

/// Options for rendering a document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prepend the `---` delimited frontmatter header
    pub include_frontmatter: bool,

    /// Run the blank-line normalizer over the rendered body
    pub normalize: bool,

    /// Collect statistics during rendering
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }

    /// Raw block output: no frontmatter, no normalization.
    pub fn raw() -> Self {
        Self::default().with_frontmatter(false).with_normalize(false)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: true,
            normalize: true,
            collect_stats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert!(options.include_frontmatter);
        assert!(options.normalize);
        assert!(!options.collect_stats);
    }

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_frontmatter(false)
            .with_stats(true);

        assert!(!options.include_frontmatter);
        assert!(options.normalize);
        assert!(options.collect_stats);

        let raw = RenderOptions::raw();
        assert!(!raw.include_frontmatter);
        assert!(!raw.normalize);
    }
}
