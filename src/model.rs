use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Amount, if the ingredient has one ("salt to taste" does not)
    pub quantity: Option<f64>,
    pub unit: String,
    pub description: String,
}

/// A fully loaded recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub source_url: String,
    pub image_url: String,
    pub servings: u32,
    /// Cooking time in minutes
    pub cooking_time: u32,
    pub ingredients: Vec<Ingredient>,
    /// Developer key the recipe was uploaded with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Derived from bookmark membership
    #[serde(default)]
    pub bookmarked: bool,
}

impl Recipe {
    /// Rescale every ingredient to `new_servings` and store the new count.
    ///
    /// Callers must ensure `new_servings >= 1`.
    pub(crate) fn scale_to(&mut self, new_servings: u32) {
        let old = f64::from(self.servings.max(1));
        let new = f64::from(new_servings);
        for ingredient in &mut self.ingredients {
            if let Some(quantity) = ingredient.quantity.as_mut() {
                *quantity = *quantity * new / old;
            }
        }
        self.servings = new_servings;
    }
}

/// Lightweight projection of a recipe used by the results list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl From<&Recipe> for SearchResult {
    fn from(recipe: &Recipe) -> Self {
        SearchResult {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            publisher: recipe.publisher.clone(),
            image_url: recipe.image_url.clone(),
            key: recipe.key.clone(),
        }
    }
}

/// Query, results and pagination cursor of the last search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    /// 1-based page number
    pub page: usize,
    pub results_per_page: usize,
}

impl SearchState {
    pub fn new(results_per_page: usize) -> Self {
        SearchState {
            query: String::new(),
            results: Vec::new(),
            page: 1,
            results_per_page: results_per_page.max(1),
        }
    }

    /// Number of pages needed to show every result (0 when there are none)
    pub fn num_pages(&self) -> usize {
        self.results.len().div_ceil(self.results_per_page)
    }

    /// Results on `page`, or an empty slice when the page does not exist
    pub fn page_slice(&self, page: usize) -> &[SearchResult] {
        if page == 0 || page > self.num_pages() {
            return &[];
        }
        let start = (page - 1) * self.results_per_page;
        let end = (start + self.results_per_page).min(self.results.len());
        &self.results[start..end]
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            current_page: self.page,
            num_pages: self.num_pages(),
        }
    }
}

/// What the pagination buttons need to know
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: usize,
    pub num_pages: usize,
}

impl Pagination {
    pub fn prev_page(&self) -> Option<usize> {
        (self.current_page > 1 && self.current_page <= self.num_pages)
            .then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        (self.current_page < self.num_pages).then(|| self.current_page + 1)
    }
}

/// Saved recipes, unique by id, in the order they were added.
///
/// Serialized as a JSON object mapping id to recipe; member order follows
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkSet {
    recipes: Vec<Recipe>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.recipes.iter().any(|recipe| recipe.id == id)
    }

    /// Insert a snapshot of `recipe`; returns false if its id is already present
    pub fn insert(&mut self, recipe: Recipe) -> bool {
        if self.contains(&recipe.id) {
            return false;
        }
        self.recipes.push(recipe);
        true
    }

    /// Remove the entry with `id`; returns the removed recipe if there was one
    pub fn remove(&mut self, id: &str) -> Option<Recipe> {
        let index = self.recipes.iter().position(|recipe| recipe.id == id)?;
        Some(self.recipes.remove(index))
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }
}

impl Serialize for BookmarkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.recipes.len()))?;
        for recipe in &self.recipes {
            map.serialize_entry(&recipe.id, recipe)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BookmarkSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BookmarkSetVisitor;

        impl<'de> Visitor<'de> for BookmarkSetVisitor {
            type Value = BookmarkSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of recipe id to recipe")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<BookmarkSet, A::Error> {
                let mut set = BookmarkSet::new();
                while let Some((id, mut recipe)) = access.next_entry::<String, Recipe>()? {
                    // The map key wins if the two ever disagree
                    recipe.id = id;
                    set.insert(recipe);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(BookmarkSetVisitor)
    }
}
