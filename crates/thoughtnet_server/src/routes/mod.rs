use lazy_static::lazy_static;
use rocket::route::Route;
pub(crate) mod thought;
mod user;

lazy_static! {
    pub(crate) static ref USER_ROUTES: Vec<Route> = routes![
        user::list_users,
        user::get_user,
        user::create_user,
        user::update_user,
        user::delete_user,
        user::add_friend,
        user::delete_friend,
    ];
    pub(crate) static ref THOUGHT_ROUTES: Vec<Route> = routes![
        thought::list_thoughts,
        thought::get_thought,
        thought::create_thought,
        thought::update_thought,
        thought::delete_thought,
        thought::add_reaction,
        thought::delete_reaction,
    ];
}
