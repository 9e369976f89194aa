//! Catalog
//!
//! Search, ordering and pagination rules for property listings. Stores that
//! can push these down to a query engine must produce the same pages as
//! [`CatalogQuery::apply`].

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::properties::{Property, UnknownVariant};

/// Listing page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 3;

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Creation order.
    #[default]
    Default,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// Largest first.
    AreaDesc,
}

impl SortOrder {
    /// Query-string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::AreaDesc => "area_desc",
        }
    }

    /// Compare two properties under this order. Ties fall back to creation
    /// order so pages are stable.
    pub fn compare(self, a: &Property, b: &Property) -> Ordering {
        let primary = match self {
            Self::Default => Ordering::Equal,
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::AreaDesc => b.area.cmp(&a.area),
        };

        primary.then_with(|| a.uuid.cmp(&b.uuid))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "default" => Ok(Self::Default),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "area_desc" => Ok(Self::AreaDesc),
            other => Err(UnknownVariant {
                kind: "sort order",
                value: other.to_string(),
            }),
        }
    }
}

/// Catalog listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Case-insensitive text matched against name, address and description.
    pub search: Option<String>,
    pub sort: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: SortOrder::Default,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogQuery {
    /// The search term, trimmed, if one was given.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Whether an active property is visible under this query's search.
    pub fn matches(&self, property: &Property) -> bool {
        if !property.active {
            return false;
        }

        let Some(term) = self.search_term() else {
            return true;
        };

        let term = term.to_lowercase();

        [&property.name, &property.address, &property.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// Filter, sort and paginate an in-memory collection.
    pub fn apply<I>(&self, properties: I) -> Page<Property>
    where
        I: IntoIterator<Item = Property>,
    {
        let mut matching: Vec<Property> = properties
            .into_iter()
            .filter(|property| self.matches(property))
            .collect();

        matching.sort_by(|a, b| self.sort.compare(a, b));

        let window = PageWindow::new(self.page, self.page_size, matching.len() as u64);

        let items = matching
            .into_iter()
            .skip(usize::try_from(window.offset()).unwrap_or(usize::MAX))
            .take(window.page_size as usize)
            .collect();

        window.into_page(items)
    }
}

/// Position of a page within a result set, clamped to the pages that exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub pages: u32,
}

impl PageWindow {
    /// Resolve a requested page against a total count. Page 0 becomes the
    /// first page, pages past the end become the last page.
    pub fn new(requested: u32, page_size: u32, total: u64) -> Self {
        let page_size = page_size.max(1);
        let pages = u32::try_from(total.div_ceil(u64::from(page_size)))
            .unwrap_or(u32::MAX)
            .max(1);
        let page = requested.clamp(1, pages);

        Self {
            page,
            page_size,
            total,
            pages,
        }
    }

    /// Number of items to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Attach the items of this window.
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            pages: self.pages,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub pages: u32,
}

impl<T> Page<T> {
    /// Transform the items, keeping the page position.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            pages: self.pages,
        }
    }

    /// Whether more than one page exists.
    pub fn is_paginated(&self) -> bool {
        self.pages > 1
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::properties::{PropertyKind, PropertyUuid};

    use super::*;

    fn property(name: &str, price: i64, area: i64) -> Property {
        Property {
            uuid: PropertyUuid::new(),
            name: name.to_string(),
            description: format!("{name} description"),
            price: Decimal::new(price, 0),
            area: Decimal::new(area, 0),
            address: "Moscow".to_string(),
            rooms: 1,
            floor: None,
            total_floors: None,
            kind: PropertyKind::House,
            active: true,
            image_key: None,
        }
    }

    fn names(page: &Page<Property>) -> Vec<&str> {
        page.items.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn default_order_is_creation_order() {
        let props = vec![
            property("a", 300, 10),
            property("b", 100, 30),
            property("c", 200, 20),
        ];

        let page = CatalogQuery {
            page_size: 10,
            ..CatalogQuery::default()
        }
        .apply(props);

        assert_eq!(names(&page), ["a", "b", "c"]);
    }

    #[test]
    fn sorts_by_price_and_area() {
        let props = vec![
            property("a", 300, 10),
            property("b", 100, 30),
            property("c", 200, 20),
        ];

        let query = |sort| CatalogQuery {
            sort,
            page_size: 10,
            ..CatalogQuery::default()
        };

        assert_eq!(
            names(&query(SortOrder::PriceAsc).apply(props.clone())),
            ["b", "c", "a"]
        );
        assert_eq!(
            names(&query(SortOrder::PriceDesc).apply(props.clone())),
            ["a", "c", "b"]
        );
        assert_eq!(
            names(&query(SortOrder::AreaDesc).apply(props)),
            ["b", "c", "a"]
        );
    }

    #[test]
    fn inactive_properties_are_hidden() {
        let mut hidden = property("hidden", 1, 1);
        hidden.active = false;

        let page = CatalogQuery::default().apply(vec![property("shown", 1, 1), hidden]);

        assert_eq!(names(&page), ["shown"]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut by_address = property("plain", 1, 1);
        by_address.address = "Presnenskaya Embankment".to_string();

        let query = CatalogQuery {
            search: Some("  EMBANKMENT ".to_string()),
            ..CatalogQuery::default()
        };

        let page = query.apply(vec![property("other", 1, 1), by_address]);

        assert_eq!(names(&page), ["plain"]);
    }

    #[test]
    fn pages_are_clamped() {
        let props: Vec<Property> = (0..7).map(|i| property(&i.to_string(), 1, 1)).collect();

        let last = CatalogQuery {
            page: 99,
            ..CatalogQuery::default()
        }
        .apply(props.clone());

        assert_eq!(last.page, 3);
        assert_eq!(last.pages, 3);
        assert_eq!(names(&last), ["6"]);
        assert!(last.is_paginated());

        let first = CatalogQuery {
            page: 0,
            ..CatalogQuery::default()
        }
        .apply(props);

        assert_eq!(first.page, 1);
        assert_eq!(names(&first), ["0", "1", "2"]);
    }

    #[test]
    fn empty_catalog_has_one_empty_page() {
        let page = CatalogQuery::default().apply(Vec::new());

        assert_eq!(page.pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
        assert!(!page.is_paginated());
    }

    #[test]
    fn parses_sort_orders() {
        assert_eq!("price_desc".parse::<SortOrder>(), Ok(SortOrder::PriceDesc));
        assert_eq!("".parse::<SortOrder>(), Ok(SortOrder::Default));
        assert!("cheapest".parse::<SortOrder>().is_err());
    }
}
