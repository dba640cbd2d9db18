use crate::catchers::{failed, ThoughtnetResponse};
use crate::guards::DocumentId;
use crate::integrity::Integrity;
use rocket::serde::json::Json;
use rocket::State;
use thoughtnet_common::errors::ThoughtnetError;
use thoughtnet_common::http::requests::{CreateUserRequest, UpdateUserRequest};
use thoughtnet_common::http::responses::{
    FriendResponse, MessageResponse, PopulatedUserView, UserView,
};
use tracing::info;

/// GET REQUESTS ///

/**
 * List every user, references left unexpanded
 *
 * @return status:
 *             * 200 with an array of users
 *             * 500 if db fails or other unknown issue
 */
#[get("/")]
pub async fn list_users(
    integrity: &State<Integrity>,
) -> Result<Json<Vec<UserView>>, ThoughtnetResponse> {
    let users = integrity.list_users().await.map_err(failed("Error listing users"))?;
    Ok(Json(users.iter().map(UserView::from).collect()))
}

/**
 * Fetch one user with thoughts and friends expanded into full documents
 *
 * @param user_id - the id of the user
 * @return status:
 *             * 200 with the populated user
 *             * 400 if user_id is not a valid id
 *             * 404 if no user has this id
 *             * 500 if db fails or other unknown issue
 */
#[get("/<user_id>")]
pub async fn get_user(
    user_id: Result<DocumentId, ThoughtnetError>,
    integrity: &State<Integrity>,
) -> Result<Json<PopulatedUserView>, ThoughtnetResponse> {
    let DocumentId(id) = user_id?;
    let populated = integrity
        .get_user(&id)
        .await
        .map_err(failed("Error fetching user"))?;
    Ok(Json(PopulatedUserView::new(
        &populated.user,
        &populated.thoughts,
        &populated.friends,
    )))
}

/// POST REQUESTS ///

/**
 * Create a new user
 *
 * @param request - the CreateUserRequest containing:
 *             * username: unique, trimmed
 *             * email: unique, must look like local@domain.tld
 * @return status:
 *             * 200 with the created user
 *             * 400 if a field is missing, malformed or already used
 *             * 500 if db fails or other unknown issue
 */
#[post("/", data = "<request>")]
pub async fn create_user(
    request: Json<CreateUserRequest>,
    integrity: &State<Integrity>,
) -> Result<Json<UserView>, ThoughtnetResponse> {
    let user = integrity
        .create_user(&request)
        .await
        .map_err(failed("Error creating user"))?;
    info!("User {} created", user.username);
    Ok(Json(UserView::from(&user)))
}

/**
 * Add a friend to a user's friend list (one direction only)
 * @notice - the friend id is not checked for existence
 *
 * @param user_id - the user whose list grows
 * @param friend_id - the id to add
 * @return status:
 *             * 200 with a message and the updated user
 *             * 400 if either id is malformed
 *             * 404 if no user has user_id
 */
#[post("/<user_id>/friends/<friend_id>")]
pub async fn add_friend(
    user_id: Result<DocumentId, ThoughtnetError>,
    friend_id: Result<DocumentId, ThoughtnetError>,
    integrity: &State<Integrity>,
) -> Result<Json<FriendResponse>, ThoughtnetResponse> {
    let (DocumentId(id), DocumentId(friend)) = (user_id?, friend_id?);
    let user = integrity
        .add_friend(&id, &friend)
        .await
        .map_err(failed("Error adding new friend"))?;
    Ok(Json(FriendResponse {
        message: String::from("New friend added!"),
        user: UserView::from(&user),
    }))
}

/// PUT REQUESTS ///

/**
 * Update a user's username and/or email
 *
 * @param user_id - the id of the user
 * @param request - the fields to change, each validated as on creation
 * @return status:
 *             * 200 with the updated user
 *             * 400 if a field is invalid or already used, or user_id is malformed
 *             * 404 if no user has this id
 *             * 500 if db fails or other unknown issue
 */
#[put("/<user_id>", data = "<request>")]
pub async fn update_user(
    user_id: Result<DocumentId, ThoughtnetError>,
    request: Json<UpdateUserRequest>,
    integrity: &State<Integrity>,
) -> Result<Json<UserView>, ThoughtnetResponse> {
    let DocumentId(id) = user_id?;
    let user = integrity
        .update_user(&id, &request)
        .await
        .map_err(failed("Error updating user"))?;
    Ok(Json(UserView::from(&user)))
}

/// DELETE REQUESTS ///

/**
 * Delete a user along with every thought it lists
 *
 * @param user_id - the id of the user
 * @return status:
 *             * 200 with a status message
 *             * 400 if user_id is malformed
 *             * 404 if no user has this id
 *             * 500 if db fails or other unknown issue
 */
#[delete("/<user_id>")]
pub async fn delete_user(
    user_id: Result<DocumentId, ThoughtnetError>,
    integrity: &State<Integrity>,
) -> Result<Json<MessageResponse>, ThoughtnetResponse> {
    let DocumentId(id) = user_id?;
    let deletion = integrity
        .delete_user(&id)
        .await
        .map_err(failed("Error deleting user and associated thoughts"))?;
    info!(
        "User {} deleted with {} thoughts",
        deletion.user.username, deletion.thoughts_deleted
    );
    Ok(Json(MessageResponse::new(
        "User and associated thoughts deleted!",
    )))
}

#[delete("/<user_id>/friends/<friend_id>")]
pub async fn delete_friend(
    user_id: Result<DocumentId, ThoughtnetError>,
    friend_id: Result<DocumentId, ThoughtnetError>,
    integrity: &State<Integrity>,
) -> Result<Json<FriendResponse>, ThoughtnetResponse> {
    let (DocumentId(id), DocumentId(friend)) = (user_id?, friend_id?);
    let user = integrity
        .remove_friend(&id, &friend)
        .await
        .map_err(failed("Error deleting friend"))?;
    Ok(Json(FriendResponse {
        message: String::from("Friend successfully deleted!"),
        user: UserView::from(&user),
    }))
}
