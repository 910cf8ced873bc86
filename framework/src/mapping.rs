//! Object-to-object mapping through statically declared profiles
//!
//! A profile is an implementation of [`MapFrom`] on the destination type.
//! Values a profile needs from configuration (the public base URL for
//! pictures, for instance) travel in a [`MappingContext`].
//!
//! ```rust,ignore
//! impl MapFrom<product_brand::Model> for BrandDto {
//!     fn map_from(brand: product_brand::Model, _ctx: &MappingContext) -> Self {
//!         BrandDto { id: brand.id, name: brand.name }
//!     }
//! }
//!
//! let dtos: Vec<BrandDto> = mapper.map_all(brands);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

/// Configuration values visible to every profile
#[derive(Debug, Clone, Default)]
pub struct MappingContext {
    base_url: String,
    values: HashMap<String, String>,
}

impl MappingContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            values: HashMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Prefix a relative path with the base URL
    ///
    /// An empty path stays empty so that missing pictures serialise as `""`.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        if self.base_url.is_empty() {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Build `Self` from `S`
pub trait MapFrom<S>: Sized {
    fn map_from(source: S, ctx: &MappingContext) -> Self;
}

/// Dispatches to [`MapFrom`] profiles with a shared context
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    ctx: Arc<MappingContext>,
}

impl Mapper {
    pub fn new(ctx: MappingContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub fn context(&self) -> &MappingContext {
        &self.ctx
    }

    pub fn map<S, D: MapFrom<S>>(&self, source: S) -> D {
        D::map_from(source, &self.ctx)
    }

    /// Map every item, keeping order
    pub fn map_all<S, D, I>(&self, sources: I) -> Vec<D>
    where
        D: MapFrom<S>,
        I: IntoIterator<Item = S>,
    {
        sources
            .into_iter()
            .map(|source| D::map_from(source, &self.ctx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Row {
        id: i32,
        path: String,
    }

    #[derive(Debug, PartialEq)]
    struct Dto {
        id: i32,
        url: String,
    }

    impl MapFrom<Row> for Dto {
        fn map_from(row: Row, ctx: &MappingContext) -> Self {
            Dto {
                id: row.id,
                url: ctx.resolve_url(&row.path),
            }
        }
    }

    #[test]
    fn test_resolve_url_joins_with_single_slash() {
        let ctx = MappingContext::new("https://localhost:5001/");
        assert_eq!(
            ctx.resolve_url("/images/products/sb-ang1.png"),
            "https://localhost:5001/images/products/sb-ang1.png"
        );
        assert_eq!(ctx.resolve_url(""), "");
        assert_eq!(MappingContext::default().resolve_url("a.png"), "a.png");
    }

    #[test]
    fn test_map_all_preserves_order() {
        let mapper = Mapper::new(MappingContext::new("http://api").with_value("k", "v"));
        let rows = vec![
            Row { id: 2, path: "b.png".into() },
            Row { id: 1, path: String::new() },
        ];

        let dtos: Vec<Dto> = mapper.map_all(rows);

        assert_eq!(
            dtos,
            vec![
                Dto { id: 2, url: "http://api/b.png".into() },
                Dto { id: 1, url: String::new() },
            ]
        );
        assert_eq!(mapper.context().value("k"), Some("v"));
    }
}
