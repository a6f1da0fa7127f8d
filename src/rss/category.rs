use crate::error::{require, FeedError};
use crate::xml::{Attributes, ElementWriter, Publish, Sealed};

/// A `<category>` tag, optionally qualified by a taxonomy `domain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    domain: Option<String>,
}

impl Category {
    /// A category without a domain.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: None,
        }
    }

    pub fn builder() -> CategoryBuilder {
        CategoryBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct CategoryBuilder {
    name: Option<String>,
    domain: Option<String>,
}

impl CategoryBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn build(self) -> Result<Category, FeedError> {
        let name = require(self.name, "category")?;
        Ok(Category {
            name,
            domain: self.domain,
        })
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Category::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::new(name)
    }
}

impl Sealed for Category {}

impl Publish for Category {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        let mut attrs = Attributes::new();
        if let Some(domain) = &self.domain {
            attrs.insert("domain", domain.as_str());
        }
        writer.write_element_with("category", Some(&self.name), &attrs)
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Ordered list of categories, normalized from any accepted input shape.
///
/// | Input | Result |
/// |---|---|
/// | `&str` / `String` | one category with that name |
/// | [`Category`] | that category |
/// | `Vec` or array of either | one category per element, same order |
///
/// ```
/// use rssforge::{Categories, Category};
///
/// let from_str = Categories::from("news");
/// let from_list = Categories::from(vec![Category::new("news")]);
/// assert_eq!(from_str, from_list);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories(Vec<Category>);

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: impl Into<Category>) {
        self.0.push(category.into());
    }

    pub fn extend(&mut self, other: Categories) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.0.iter()
    }
}

impl From<&str> for Categories {
    fn from(name: &str) -> Self {
        Categories(vec![Category::new(name)])
    }
}

impl From<String> for Categories {
    fn from(name: String) -> Self {
        Categories(vec![Category::new(name)])
    }
}

impl From<Category> for Categories {
    fn from(category: Category) -> Self {
        Categories(vec![category])
    }
}

impl<T: Into<Category>> From<Vec<T>> for Categories {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Into<Category>, const N: usize> From<[T; N]> for Categories {
    fn from(items: [T; N]) -> Self {
        items.into_iter().collect()
    }
}

impl<T: Into<Category>> FromIterator<T> for Categories {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Categories(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Categories {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Sealed for Categories {}

impl Publish for Categories {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        for category in &self.0 {
            category.publish(writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlWriter;
    use pretty_assertions::assert_eq;

    fn render(node: &dyn Publish) -> String {
        let mut writer = XmlWriter::new();
        node.publish(&mut writer).unwrap();
        writer.into_string().unwrap()
    }

    #[test]
    fn test_category_requires_name() {
        let err = Category::builder().domain("x").build().unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_category_with_domain() {
        let category = Category::builder().name("123").domain("234").build().unwrap();
        assert_eq!(
            render(&category),
            r#"<category domain="234">123</category>"#
        );
    }

    #[test]
    fn test_all_shapes_normalize_to_same_output() {
        let expected = "<category>123</category><category>234</category>";
        let shapes = [
            Categories::from(vec!["123", "234"]),
            Categories::from(["123".to_string(), "234".to_string()]),
            Categories::from(vec![Category::new("123"), Category::new("234")]),
        ];
        for shape in &shapes {
            assert_eq!(render(shape), expected);
        }

        assert_eq!(Categories::from("123"), Categories::from(Category::new("123")));
    }

    #[test]
    fn test_empty_categories_write_nothing() {
        assert_eq!(render(&Categories::new()), "");
    }
}
