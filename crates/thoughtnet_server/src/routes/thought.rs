use crate::catchers::{failed, ThoughtnetResponse};
use crate::guards::DocumentId;
use crate::integrity::{Integrity, ThoughtCreation};
use rocket::serde::json::Json;
use rocket::State;
use thoughtnet_common::errors::ThoughtnetError;
use thoughtnet_common::http::requests::{
    CreateThoughtRequest, NewReactionRequest, UpdateThoughtRequest,
};
use thoughtnet_common::http::responses::{MessageResponse, OrphanedThoughtResponse, ThoughtView};
use tracing::info;

pub const ORPHANED_THOUGHT: &str = "Thought created, but no user found with this username!";

/// Both outcomes of thought creation are successes
#[derive(Responder)]
pub enum CreatedThought {
    #[response(status = 200)]
    Linked(Json<ThoughtView>),
    #[response(status = 200)]
    Orphaned(Json<OrphanedThoughtResponse>),
}

/// GET REQUESTS ///

#[get("/")]
pub async fn list_thoughts(
    integrity: &State<Integrity>,
) -> Result<Json<Vec<ThoughtView>>, ThoughtnetResponse> {
    let thoughts = integrity
        .list_thoughts()
        .await
        .map_err(failed("Error listing thoughts"))?;
    Ok(Json(thoughts.iter().map(ThoughtView::from).collect()))
}

#[get("/<thought_id>")]
pub async fn get_thought(
    thought_id: Result<DocumentId, ThoughtnetError>,
    integrity: &State<Integrity>,
) -> Result<Json<ThoughtView>, ThoughtnetResponse> {
    let DocumentId(id) = thought_id?;
    let thought = integrity
        .get_thought(&id)
        .await
        .map_err(failed("Error fetching thought"))?;
    Ok(Json(ThoughtView::from(&thought)))
}

/// POST REQUESTS ///

/**
 * Create a thought and register it with its author
 *
 * @param request - the CreateThoughtRequest containing:
 *             * thoughtText: 1 to 280 characters
 *             * username: the author, matched against existing usernames
 * @return status:
 *             * 200 with the thought if the author was found
 *             * 200 with a message and the thought if no user has the username;
 *               the thought is kept regardless
 *             * 400 if a field is missing or out of bounds
 *             * 500 if db fails or other unknown issue
 */
#[post("/", data = "<request>")]
pub async fn create_thought(
    request: Json<CreateThoughtRequest>,
    integrity: &State<Integrity>,
) -> Result<CreatedThought, ThoughtnetResponse> {
    let creation = integrity
        .create_thought(&request)
        .await
        .map_err(failed("Error creating thought"))?;
    info!("Thought by {} created", creation.thought().username);
    Ok(match creation {
        ThoughtCreation::Linked(thought) => {
            CreatedThought::Linked(Json(ThoughtView::from(&thought)))
        }
        ThoughtCreation::Orphaned(thought) => {
            CreatedThought::Orphaned(Json(OrphanedThoughtResponse {
                message: String::from(ORPHANED_THOUGHT),
                thought: ThoughtView::from(&thought),
            }))
        }
    })
}

/**
 * Append a reaction to a thought
 *
 * @param thought_id - the thought to react to
 * @param request - the NewReactionRequest containing:
 *             * reactionBody: 1 to 280 characters
 *             * username: the reacting user
 * @return status:
 *             * 200 with a status message
 *             * 400 if a field is invalid or thought_id is malformed
 *             * 404 if no thought has this id
 */
#[post("/<thought_id>/reactions", data = "<request>")]
pub async fn add_reaction(
    thought_id: Result<DocumentId, ThoughtnetError>,
    request: Json<NewReactionRequest>,
    integrity: &State<Integrity>,
) -> Result<Json<MessageResponse>, ThoughtnetResponse> {
    let DocumentId(id) = thought_id?;
    integrity
        .add_reaction(&id, &request)
        .await
        .map_err(failed("Error adding new reaction"))?;
    Ok(Json(MessageResponse::new("Successfully added new reaction!")))
}

/// PUT REQUESTS ///

/**
 * Update a thought's text and/or username
 * @notice - changing username does not move the thought to another user's list
 */
#[put("/<thought_id>", data = "<request>")]
pub async fn update_thought(
    thought_id: Result<DocumentId, ThoughtnetError>,
    request: Json<UpdateThoughtRequest>,
    integrity: &State<Integrity>,
) -> Result<Json<ThoughtView>, ThoughtnetResponse> {
    let DocumentId(id) = thought_id?;
    let thought = integrity
        .update_thought(&id, &request)
        .await
        .map_err(failed("Error updating thought"))?;
    Ok(Json(ThoughtView::from(&thought)))
}

/// DELETE REQUESTS ///

/**
 * Delete a thought and prune it from its author's list
 *
 * @param thought_id - the id of the thought
 * @return status:
 *             * 200 with a status message, whether or not the author still exists
 *             * 400 if thought_id is malformed
 *             * 404 if no thought has this id
 *             * 500 if db fails or other unknown issue
 */
#[delete("/<thought_id>")]
pub async fn delete_thought(
    thought_id: Result<DocumentId, ThoughtnetError>,
    integrity: &State<Integrity>,
) -> Result<Json<MessageResponse>, ThoughtnetResponse> {
    let DocumentId(id) = thought_id?;
    let deletion = integrity
        .delete_thought(&id)
        .await
        .map_err(failed(
            "Error deleting thought and its reference from user",
        ))?;
    if let Some(author) = deletion.pruned_from {
        info!("Thought by {} deleted", author.username);
    } else {
        info!("Orphaned thought by {} deleted", deletion.thought.username);
    }
    Ok(Json(MessageResponse::new(
        "Thought and its reference from user successfully deleted!",
    )))
}

/// Remove a reaction by reactionId; an unknown reactionId still reports success
#[delete("/<thought_id>/reactions/<reaction_id>")]
pub async fn delete_reaction(
    thought_id: Result<DocumentId, ThoughtnetError>,
    reaction_id: Result<DocumentId, ThoughtnetError>,
    integrity: &State<Integrity>,
) -> Result<Json<MessageResponse>, ThoughtnetResponse> {
    let (DocumentId(id), DocumentId(reaction)) = (thought_id?, reaction_id?);
    integrity
        .remove_reaction(&id, &reaction)
        .await
        .map_err(failed("Error deleting reaction"))?;
    Ok(Json(MessageResponse::new("Reaction successfully deleted!")))
}
