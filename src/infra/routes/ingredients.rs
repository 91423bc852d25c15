use rocket::serde::json::Json;
use rocket::State;

use crate::infra::{ApiError, Ingredient, Repository};

#[post("/ingredients", data = "<ingredient>")]
pub async fn create_ingredient(
    db: &State<Repository>,
    ingredient: Json<Ingredient>,
) -> Result<Json<Ingredient>, ApiError> {
    Ok(Json(db.ingredients.create(ingredient.into_inner()).await?))
}

#[get("/ingredients?<name>")]
pub async fn find_ingredients_by_name(
    db: &State<Repository>,
    name: Option<&str>,
) -> Result<Json<Vec<Ingredient>>, ApiError> {
    Ok(Json(db.ingredients.find_by_name(name.unwrap_or_default()).await?))
}
