use rocket::Route;

pub mod auth;
pub mod comments;
pub mod cookbook;
pub mod ingredients;
pub mod likes;
pub mod recipes;
pub mod users;

use auth::*;
use comments::*;
use cookbook::*;
use ingredients::*;
use likes::*;
use recipes::*;
use users::*;

/// Every API route, mounted under `/api`.
pub fn routes() -> Vec<Route> {
    routes![
        signup,
        login,
        profile,
        profile_post,
        logout,
        create_user,
        find_all_users,
        find_user_by_id,
        find_user_by_email,
        update_user,
        delete_user,
        delete_all_users,
        create_recipe,
        update_recipe,
        delete_recipe,
        find_recipe_by_id,
        find_all_recipes_by_user,
        find_recipes_by_dish_id,
        find_random_recipes,
        find_all_recipes,
        create_ingredient,
        find_ingredients_by_name,
        create_comment,
        find_comments,
        find_comments_by_user,
        user_likes_recipe,
        user_unlikes_recipe,
        find_recipes_liked_by_user,
        find_users_that_liked_recipe,
        is_liked_by_user,
        user_bookmarks_recipe,
        user_unbookmarks_recipe,
        find_recipes_bookmarked_by_user,
        is_bookmarked_by_user,
    ]
}
