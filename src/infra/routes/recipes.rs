use rocket::serde::json::Json;
use rocket::State;

use crate::infra::{
    parse_id, ApiError, DaoError, DeleteAck, NewRecipe, Recipe, RecipePatch, RecipeView,
    Repository, Session, UpdateAck,
};

const RANDOM_SAMPLE: usize = 5;

#[post("/users/<uid>/recipes", data = "<recipe>")]
pub async fn create_recipe(
    db: &State<Repository>,
    session: Session,
    uid: &str,
    recipe: Json<NewRecipe>,
) -> Result<Json<Recipe>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.recipes.create(uid, recipe.into_inner()).await?))
}

#[put("/recipes/<rid>", data = "<patch>")]
pub async fn update_recipe(
    db: &State<Repository>,
    rid: &str,
    patch: Json<RecipePatch>,
) -> Result<Json<UpdateAck>, ApiError> {
    Ok(Json(db.recipes.update(parse_id(rid)?, patch.into_inner()).await?))
}

#[delete("/recipes/<rid>")]
pub async fn delete_recipe(db: &State<Repository>, rid: &str) -> Result<Json<DeleteAck>, ApiError> {
    Ok(Json(db.recipes.delete(parse_id(rid)?).await?))
}

#[get("/recipes/<rid>")]
pub async fn find_recipe_by_id(db: &State<Repository>, rid: &str) -> Result<Json<RecipeView>, ApiError> {
    let recipe = db
        .recipes
        .find_by_id(parse_id(rid)?)
        .await?
        .ok_or(DaoError::NotFound("recipe"))?;
    Ok(Json(recipe))
}

#[get("/users/<uid>/recipes", rank = 2)]
pub async fn find_all_recipes_by_user(
    db: &State<Repository>,
    session: Session,
    uid: &str,
) -> Result<Json<Vec<RecipeView>>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.recipes.find_all_by_user(uid).await?))
}

#[get("/dishes/<did>/recipes")]
pub async fn find_recipes_by_dish_id(
    db: &State<Repository>,
    did: &str,
) -> Result<Json<Vec<RecipeView>>, ApiError> {
    Ok(Json(db.recipes.find_by_dish_id(did).await?))
}

#[get("/recipes/random")]
pub async fn find_random_recipes(db: &State<Repository>) -> Result<Json<Vec<RecipeView>>, ApiError> {
    Ok(Json(db.recipes.find_random(RANDOM_SAMPLE).await?))
}

#[get("/recipes")]
pub async fn find_all_recipes(db: &State<Repository>) -> Result<Json<Vec<RecipeView>>, ApiError> {
    Ok(Json(db.recipes.find_all().await?))
}
