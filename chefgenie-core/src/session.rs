//! Front-end state: which view is showing, the recipe on screen and its photo.
//!
//! Creating a recipe awaits the text and then starts the photo request in the
//! background. Every navigation bumps an epoch; a photo that arrives for an
//! older epoch is dropped instead of being shown next to the wrong recipe.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::cookbook::{Cookbook, KeyValueStore, Saveable};
use crate::error::{GenerationError, StoreError};
use crate::generator::RecipeGenerator;
use crate::types::{Rating, Recipe, RecipeRequest, SavedRecipe};

/// Shown when a new recipe could not be generated.
pub const GENERATION_FAILED_MESSAGE: &str =
    "We couldn't generate a recipe at this moment. Please check your connection and API key.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Create,
    Cookbook,
}

/// The recipe currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveRecipe {
    Fresh(Recipe),
    Saved(SavedRecipe),
}

impl ActiveRecipe {
    pub fn recipe(&self) -> &Recipe {
        match self {
            ActiveRecipe::Fresh(recipe) => recipe,
            ActiveRecipe::Saved(saved) => &saved.recipe,
        }
    }
}

impl From<ActiveRecipe> for Saveable {
    fn from(active: ActiveRecipe) -> Self {
        match active {
            ActiveRecipe::Fresh(recipe) => Saveable::Fresh(recipe),
            ActiveRecipe::Saved(saved) => Saveable::Saved(saved),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    None,
    Pending,
    Ready(String),
    Unavailable,
}

impl ImageState {
    pub fn data_uri(&self) -> Option<&str> {
        match self {
            ImageState::Ready(uri) => Some(uri),
            _ => None,
        }
    }
}

/// Handle to a background photo request.
#[derive(Debug)]
pub struct ImageTicket {
    pub epoch: u64,
    pub handle: JoinHandle<Option<String>>,
}

pub struct Session<G: RecipeGenerator + 'static> {
    generator: Arc<G>,
    view: View,
    active: Option<ActiveRecipe>,
    image: ImageState,
    loading: bool,
    error: Option<String>,
    epoch: u64,
}

impl<G: RecipeGenerator + 'static> Session<G> {
    pub fn new(generator: Arc<G>) -> Self {
        Self {
            generator,
            view: View::Create,
            active: None,
            image: ImageState::None,
            loading: false,
            error: None,
            epoch: 0,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn active(&self) -> Option<&ActiveRecipe> {
        self.active.as_ref()
    }

    pub fn image(&self) -> &ImageState {
        &self.image
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Drop whatever is on screen and invalidate pending photos.
    fn clear_active(&mut self) {
        self.epoch += 1;
        self.active = None;
        self.image = ImageState::None;
    }

    /// Generate a recipe and start fetching its photo.
    ///
    /// On failure the session holds [`GENERATION_FAILED_MESSAGE`] and no
    /// ticket is returned. The ticket's task keeps running even if the user
    /// navigates away; its result is then ignored.
    pub async fn create_recipe(&mut self, request: &RecipeRequest) -> Option<ImageTicket> {
        self.clear_active();
        self.error = None;
        self.loading = true;

        let result = self.generator.generate_recipe(request).await;
        self.loading = false;

        let recipe = match result {
            Ok(recipe) => recipe,
            Err(e) => {
                tracing::warn!("Recipe generation failed: {}", e);
                self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
                return None;
            }
        };

        let generator = Arc::clone(&self.generator);
        let title = recipe.title.clone();
        let description = recipe.description.clone();
        let handle = tokio::spawn(async move {
            generator
                .generate_recipe_image(&title, &description)
                .await
        });

        self.active = Some(ActiveRecipe::Fresh(recipe));
        self.image = ImageState::Pending;

        Some(ImageTicket {
            epoch: self.epoch,
            handle,
        })
    }

    /// Apply a finished photo request. Returns `false` if it was stale.
    pub fn apply_image(&mut self, epoch: u64, image: Option<String>) -> bool {
        if epoch != self.epoch || self.image != ImageState::Pending {
            tracing::debug!(epoch, current = self.epoch, "Discarding stale image");
            return false;
        }
        self.image = match image {
            Some(uri) => ImageState::Ready(uri),
            None => ImageState::Unavailable,
        };
        true
    }

    /// Wait for a photo request and apply it.
    pub async fn await_image(&mut self, ticket: ImageTicket) -> bool {
        let image = match ticket.handle.await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("Image task failed: {}", e);
                None
            }
        };
        self.apply_image(ticket.epoch, image)
    }

    pub fn show_cookbook(&mut self) {
        self.clear_active();
        self.view = View::Cookbook;
    }

    pub fn show_create(&mut self) {
        self.clear_active();
        self.view = View::Create;
    }

    /// Back to an empty create form.
    pub fn reset(&mut self) {
        self.show_create();
        self.error = None;
    }

    /// Open a saved recipe, with its stored photo if any.
    pub fn select_saved(&mut self, saved: SavedRecipe) {
        self.clear_active();
        self.image = match &saved.image_url {
            Some(uri) => ImageState::Ready(uri.clone()),
            None => ImageState::None,
        };
        self.active = Some(ActiveRecipe::Saved(saved));
        self.view = View::Create;
    }

    /// Ask about the recipe on screen. `None` if there is none.
    pub async fn ask(&self, question: &str) -> Option<String> {
        let recipe = self.active.as_ref()?.recipe();
        Some(self.generator.ask_chef_about_recipe(recipe, question).await)
    }

    /// Replace the recipe on screen with a revised one.
    ///
    /// The revision is a new recipe, so any cookbook identity is dropped.
    /// Returns `Ok(false)` if nothing is on screen.
    pub async fn tweak(&mut self, feedback: &str) -> Result<bool, GenerationError> {
        let Some(active) = self.active.as_ref() else {
            return Ok(false);
        };
        let revised = self
            .generator
            .tweak_recipe(active.recipe(), feedback)
            .await?;
        self.active = Some(ActiveRecipe::Fresh(revised));
        Ok(true)
    }

    /// Save the recipe on screen together with its photo.
    ///
    /// A `None` rating or note keeps whatever the cookbook already holds for
    /// the same title.
    pub fn save_active<S: KeyValueStore>(
        &mut self,
        cookbook: &Cookbook<S>,
        rating: Option<Rating>,
        notes: Option<String>,
    ) -> Result<Option<&SavedRecipe>, StoreError> {
        let Some(active) = self.active.clone() else {
            return Ok(None);
        };
        let stored = cookbook.find(&active.recipe().title);
        let rating = rating.or_else(|| stored.as_ref().and_then(|s| s.rating));
        let notes = notes.or_else(|| stored.and_then(|s| s.notes));
        let image = self.image.data_uri().map(str::to_string);
        let saved = cookbook.save(active, image, rating, notes)?;
        self.active = Some(ActiveRecipe::Saved(saved));
        Ok(match &self.active {
            Some(ActiveRecipe::Saved(saved)) => Some(saved),
            _ => None,
        })
    }

    /// Persist a new rating or notes, but only for recipes already saved.
    pub fn annotate_active<S: KeyValueStore>(
        &mut self,
        cookbook: &Cookbook<S>,
        rating: Option<Rating>,
        notes: Option<String>,
    ) -> Result<bool, StoreError> {
        let Some(title) = self.active.as_ref().map(|a| a.recipe().title.clone()) else {
            return Ok(false);
        };
        if !cookbook.update_rating_or_notes(&title, rating, notes)? {
            return Ok(false);
        }
        if let Some(saved) = cookbook.find(&title) {
            self.active = Some(ActiveRecipe::Saved(saved));
        }
        Ok(true)
    }

    /// Remove the recipe on screen from the cookbook and go back to the form.
    pub fn delete_active<S: KeyValueStore>(
        &mut self,
        cookbook: &Cookbook<S>,
    ) -> Result<bool, StoreError> {
        let Some(title) = self.active.as_ref().map(|a| a.recipe().title.clone()) else {
            return Ok(false);
        };
        let deleted = cookbook.delete(&title)?;
        self.reset();
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;
    use crate::cookbook::MemoryStore;
    use crate::generator::ChefClient;
    use crate::types::MealType;

    const RECIPE_JSON: &str = r#"{
        "title": "Miso Salmon",
        "description": "Glazed and quick.",
        "mealType": "Dinner",
        "servings": 2,
        "prepTimeMinutes": 10,
        "cookTimeMinutes": 12,
        "difficulty": "Medium",
        "ingredients": [{"name": "salmon", "amount": "2 fillets"}],
        "instructions": ["Glaze.", "Broil."]
    }"#;

    fn session_with(client: FakeAiClient) -> Session<ChefClient> {
        Session::new(Arc::new(ChefClient::new(Arc::new(client))))
    }

    fn request() -> RecipeRequest {
        RecipeRequest::new(MealType::Dinner, "salmon", None, 2)
    }

    #[tokio::test]
    async fn test_create_then_image() {
        let mut session = session_with(
            FakeAiClient::with_response("Create a unique", RECIPE_JSON)
                .with_image("image/png", "AAAA"),
        );

        let ticket = session.create_recipe(&request()).await.unwrap();
        assert!(!session.is_loading());
        assert_eq!(session.image(), &ImageState::Pending);
        assert_eq!(session.active().unwrap().recipe().title, "Miso Salmon");

        assert!(session.await_image(ticket).await);
        assert_eq!(
            session.image().data_uri(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[tokio::test]
    async fn test_missing_image_is_unavailable() {
        let mut session = session_with(
            FakeAiClient::with_response("Create a unique", RECIPE_JSON).with_failing_images(),
        );
        let ticket = session.create_recipe(&request()).await.unwrap();
        assert!(session.await_image(ticket).await);
        assert_eq!(session.image(), &ImageState::Unavailable);
    }

    #[tokio::test]
    async fn test_generation_failure_sets_message() {
        let mut session = session_with(FakeAiClient::with_response("Create a unique", "oops"));
        assert!(session.create_recipe(&request()).await.is_none());
        assert_eq!(session.error(), Some(GENERATION_FAILED_MESSAGE));
        assert!(session.active().is_none());
    }

    #[tokio::test]
    async fn test_image_after_navigation_is_discarded() {
        let mut session = session_with(
            FakeAiClient::with_response("Create a unique", RECIPE_JSON)
                .with_image("image/png", "AAAA"),
        );
        let ticket = session.create_recipe(&request()).await.unwrap();
        session.show_cookbook();

        assert!(!session.await_image(ticket).await);
        assert_eq!(session.view(), View::Cookbook);
        assert_eq!(session.image(), &ImageState::None);
    }

    #[tokio::test]
    async fn test_save_rate_delete_flow() {
        let mut session = session_with(
            FakeAiClient::with_response("Create a unique", RECIPE_JSON)
                .with_image("image/png", "AAAA"),
        );
        let cookbook = Cookbook::new(MemoryStore::new());

        // Rating before saving does not persist anything
        session.create_recipe(&request()).await.unwrap();
        assert!(!session
            .annotate_active(&cookbook, Rating::from_stars(2).unwrap(), None)
            .unwrap());
        assert!(cookbook.list_saved().is_empty());

        let ticket = session.create_recipe(&request()).await.unwrap();
        session.await_image(ticket).await;
        let saved = session.save_active(&cookbook, None, None).unwrap().unwrap().clone();
        assert_eq!(saved.image_url.as_deref(), Some("data:image/png;base64,AAAA"));

        assert!(session
            .annotate_active(&cookbook, Rating::from_stars(5).unwrap(), Some("great".into()))
            .unwrap());
        let stored = cookbook.find("Miso Salmon").unwrap();
        assert_eq!(stored.rating.map(|r| r.stars()), Some(5));
        assert_eq!(stored.id, saved.id);

        assert!(session.delete_active(&cookbook).unwrap());
        assert!(cookbook.list_saved().is_empty());
        assert!(session.active().is_none());
    }

    #[tokio::test]
    async fn test_resave_keeps_stored_rating_and_notes() {
        let mut session = session_with(
            FakeAiClient::new()
                .and_response("wants to modify", RECIPE_JSON)
                .and_response("Create a unique", RECIPE_JSON),
        );
        let cookbook = Cookbook::new(MemoryStore::new());

        session.create_recipe(&request()).await.unwrap();
        session.save_active(&cookbook, None, None).unwrap();
        cookbook
            .update_rating_or_notes(
                "Miso Salmon",
                Rating::from_stars(4).unwrap(),
                Some("less sugar".to_string()),
            )
            .unwrap();

        // Same title back from a tweak
        assert!(session.tweak("keep it").await.unwrap());
        session.save_active(&cookbook, None, None).unwrap();
        let stored = cookbook.find("Miso Salmon").unwrap();
        assert_eq!(stored.rating.map(|r| r.stars()), Some(4));
        assert_eq!(stored.notes.as_deref(), Some("less sugar"));

        // A fresh generation with the same title
        session.create_recipe(&request()).await.unwrap();
        session
            .save_active(&cookbook, Rating::from_stars(2).unwrap(), None)
            .unwrap();
        let all = cookbook.list_saved();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].rating.map(|r| r.stars()), Some(2));
        assert_eq!(all[0].notes.as_deref(), Some("less sugar"));
    }

    #[tokio::test]
    async fn test_select_saved_uses_stored_image() {
        let mut session = session_with(FakeAiClient::new());
        let cookbook = Cookbook::new(MemoryStore::new());
        let recipe = Recipe::from_model_json(RECIPE_JSON).unwrap();
        let saved = cookbook
            .save(recipe, Some("data:image/gif;base64,R0lG".to_string()), None, None)
            .unwrap();

        session.show_cookbook();
        session.select_saved(saved);

        assert_eq!(session.view(), View::Create);
        assert_eq!(session.image().data_uri(), Some("data:image/gif;base64,R0lG"));
    }

    #[tokio::test]
    async fn test_tweak_replaces_active_recipe() {
        let tweaked = RECIPE_JSON.replace("Miso Salmon", "Spicy Miso Salmon");
        let mut session = session_with(
            FakeAiClient::new()
                .and_response("wants to modify", &tweaked)
                .and_response("Create a unique", RECIPE_JSON),
        );

        assert!(!session.tweak("spicier").await.unwrap());

        session.create_recipe(&request()).await.unwrap();
        assert!(session.tweak("spicier").await.unwrap());
        assert_eq!(
            session.active().unwrap().recipe().title,
            "Spicy Miso Salmon"
        );
    }

    #[tokio::test]
    async fn test_tweak_error_keeps_recipe() {
        let mut session = session_with(
            FakeAiClient::new()
                .and_error("wants to modify", "down")
                .and_response("Create a unique", RECIPE_JSON),
        );
        session.create_recipe(&request()).await.unwrap();

        assert!(session.tweak("spicier").await.is_err());
        assert_eq!(session.active().unwrap().recipe().title, "Miso Salmon");
    }
}
