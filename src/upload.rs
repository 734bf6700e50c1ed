use serde::{Deserialize, Serialize};

use crate::error::ForkifyError;
use crate::model::Ingredient;

/// Raw values of the add-recipe form, as the user typed them
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadForm {
    pub title: String,
    pub source_url: String,
    pub image: String,
    pub publisher: String,
    pub cooking_time: String,
    pub servings: String,
    /// Lines of the form `quantity,unit,description`; blank lines are skipped
    pub ingredients: Vec<String>,
}

impl UploadForm {
    /// Build a form from `(field name, value)` pairs.
    ///
    /// Every field whose name starts with `ingredient` is an ingredient line,
    /// kept in the order given. Unknown names are ignored.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = UploadForm::default();
        for (name, value) in entries {
            let value = value.into();
            match name.as_ref() {
                "title" => form.title = value,
                "sourceUrl" => form.source_url = value,
                "image" => form.image = value,
                "publisher" => form.publisher = value,
                "cookingTime" => form.cooking_time = value,
                "servings" => form.servings = value,
                n if n.starts_with("ingredient") => form.ingredients.push(value),
                _ => {}
            }
        }
        form
    }

    /// Validate the form and turn it into the payload the API expects
    pub fn into_new_recipe(self) -> Result<NewRecipe, ForkifyError> {
        let ingredients = self
            .ingredients
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| parse_ingredient(line))
            .collect::<Result<Vec<_>, _>>()?;

        let cooking_time = parse_number("cooking time", &self.cooking_time)?;
        let servings = parse_number("servings", &self.servings)?;
        if servings < 1 {
            return Err(ForkifyError::InvalidServings(servings));
        }

        Ok(NewRecipe {
            title: self.title.trim().to_string(),
            source_url: self.source_url.trim().to_string(),
            image_url: self.image.trim().to_string(),
            publisher: self.publisher.trim().to_string(),
            cooking_time,
            servings,
            ingredients,
        })
    }
}

/// Recipe payload sent to the API on upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecipe {
    pub title: String,
    pub source_url: String,
    pub image_url: String,
    pub publisher: String,
    pub cooking_time: u32,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
}

/// Parse one `quantity,unit,description` line. The quantity may be empty.
pub fn parse_ingredient(line: &str) -> Result<Ingredient, ForkifyError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [quantity, unit, description] = fields.as_slice() else {
        return Err(ForkifyError::InvalidIngredient(line.to_string()));
    };

    let quantity = if quantity.is_empty() {
        None
    } else {
        let value = quantity
            .parse::<f64>()
            .ok()
            .filter(|q| q.is_finite())
            .ok_or_else(|| ForkifyError::InvalidIngredient(line.to_string()))?;
        Some(value)
    };

    Ok(Ingredient {
        quantity,
        unit: unit.to_string(),
        description: description.to_string(),
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<u32, ForkifyError> {
    value
        .trim()
        .parse()
        .map_err(|_| ForkifyError::InvalidField {
            field,
            value: value.to_string(),
        })
}
