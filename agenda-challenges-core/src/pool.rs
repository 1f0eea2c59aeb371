//! Challenge pool: categories of candidate lines, flattened for sampling.
//!
//! A pool is loaded once per run from a challenges file and never mutated
//! afterwards. Two file shapes are accepted:
//! - YAML: a list of categories (`name`, `lines`, optional `max_per_page`,
//!   `min_per_page` and `strikeout`).
//! - Plain text (`.txt`): one challenge per line, loaded as a single uncapped
//!   category named [`PLAIN_CATEGORY`].

use std::collections::{HashMap, HashSet};
use std::fs;
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::PoolError;

/// Category name given to challenges loaded from a plain text file.
pub const PLAIN_CATEGORY: &str = "challenges";

/// A named group of lines sharing a per-page cap and a display style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub lines: Vec<String>,
    /// Upper bound of lines from this category on one page. Unbounded when absent.
    #[serde(default)]
    pub max_per_page: Option<usize>,
    /// Lower bound of lines from this category on every page.
    #[serde(default)]
    pub min_per_page: usize,
    #[serde(default)]
    pub strikeout: bool,
}

impl Category {
    pub fn new<S: Into<String>>(name: S, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
            max_per_page: None,
            min_per_page: 0,
            strikeout: false,
        }
    }

    pub fn with_max_per_page(mut self, max: usize) -> Self {
        self.max_per_page = Some(max);
        self
    }

    pub fn with_min_per_page(mut self, min: usize) -> Self {
        self.min_per_page = min;
        self
    }

    pub fn with_strikeout(mut self, strikeout: bool) -> Self {
        self.strikeout = strikeout;
        self
    }

    /// Effective cap; `usize::MAX` stands in for "no cap".
    pub fn cap(&self) -> usize {
        self.max_per_page.unwrap_or(usize::MAX)
    }

    pub fn style(&self) -> LineStyle {
        if self.strikeout {
            LineStyle::Strikeout
        } else {
            LineStyle::Plain
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Plain,
    Strikeout,
}

/// One candidate challenge. Belongs to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    pub text: String,
    pub category: String,
    pub style: LineStyle,
}

/// The flattened, read-only set of lines for one run.
///
/// Lines of a category occupy a contiguous range of [`Pool::lines`], in the
/// order the category appears in the source.
#[derive(Debug, Clone)]
pub struct Pool {
    categories: Vec<Category>,
    lines: Vec<Line>,
    ranges: Vec<Range<usize>>,
    line_category: Vec<usize>,
    by_name: HashMap<String, usize>,
}

impl Pool {
    /// Builds a pool, rejecting duplicate or empty category names and
    /// collapsing repeated lines within a category.
    pub fn from_categories(categories: Vec<Category>) -> Result<Self, PoolError> {
        let mut by_name = HashMap::with_capacity(categories.len());
        let mut kept = Vec::with_capacity(categories.len());
        let mut lines = Vec::new();
        let mut ranges = Vec::with_capacity(categories.len());
        let mut line_category = Vec::new();

        for mut category in categories {
            if category.name.trim().is_empty() {
                return Err(PoolError::UnnamedCategory);
            }
            if by_name.contains_key(&category.name) {
                return Err(PoolError::DuplicateCategory(category.name));
            }

            let mut seen = HashSet::new();
            let before = category.lines.len();
            category.lines.retain(|line| seen.insert(line.clone()));
            if category.lines.len() != before {
                warn!(
                    category = %category.name,
                    dropped = before - category.lines.len(),
                    "Dropped repeated lines in category"
                );
            }

            let idx = kept.len();
            let start = lines.len();
            let style = category.style();
            for text in &category.lines {
                lines.push(Line {
                    text: text.clone(),
                    category: category.name.clone(),
                    style,
                });
                line_category.push(idx);
            }
            ranges.push(start..lines.len());
            by_name.insert(category.name.clone(), idx);
            debug!(
                category = %category.name,
                lines = category.lines.len(),
                max_per_page = ?category.max_per_page,
                min_per_page = category.min_per_page,
                "Added category to pool"
            );
            kept.push(category);
        }

        if lines.is_empty() {
            return Err(PoolError::Empty);
        }

        Ok(Self {
            categories: kept,
            lines,
            ranges,
            line_category,
            by_name,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.by_name.get(name).map(|&idx| &self.categories[idx])
    }

    pub(crate) fn category_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Index into [`Pool::categories`] of the category owning line `line_idx`.
    pub(crate) fn category_of(&self, line_idx: usize) -> usize {
        self.line_category[line_idx]
    }

    /// Range into [`Pool::lines`] holding the lines of category `category_idx`.
    pub(crate) fn range_of(&self, category_idx: usize) -> Range<usize> {
        self.ranges[category_idx].clone()
    }
}

/// Loads a challenges file; `.txt` files are read as plain lists, anything
/// else as YAML.
pub fn load_pool<P: AsRef<Path>>(path: P) -> Result<Pool, PoolError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading challenges");

    let content = fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to read challenges file");
        PoolError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    let is_plain = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    let pool = if is_plain {
        parse_plain(&content)
    } else {
        parse_yaml(&content)
    };

    match &pool {
        Ok(pool) => info!(
            path = %path.display(),
            categories = pool.categories().len(),
            lines = pool.len(),
            "Loaded challenge pool"
        ),
        Err(e) => error!(error = %e, path = %path.display(), "Invalid challenges file"),
    }
    pool
}

pub fn parse_yaml(content: &str) -> Result<Pool, PoolError> {
    let categories: Vec<Category> = serde_yaml::from_str(content)?;
    Pool::from_categories(categories)
}

pub fn parse_plain(content: &str) -> Result<Pool, PoolError> {
    let lines = content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();
    Pool::from_categories(vec![Category::new(PLAIN_CATEGORY, lines)])
}
