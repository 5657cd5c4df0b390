//! Recipe submission: step images, create/update, cover, reconcile.
//!
//! A submission walks a fixed phase sequence:
//!
//! ```text
//! Idle -> Validating -> UploadingSteps -> CreatingRecipe -> UploadingCover -> Reconciling -> Idle
//!            |                 |                 |                 |
//!            v                 +------ Failed ---+-----------------+--> Idle
//!         Aborted
//! ```
//!
//! Step images upload concurrently and join all-or-fail; the create call
//! only starts once every step image is hosted, and the cover only uploads
//! once the create call has returned an id. There is no retry and no
//! clean-up of step images orphaned by a later failure.

use crate::client::CookMeClient;
use crate::error::{ClientError, Result};
use crate::lists::{ListCaches, ListKind};
use crate::session::SessionStore;
use crate::types::CreateRecipeRequest;
use cookme_core::{
    CoverImage, DraftStep, RecipeDraft, RecipeId, RecipeMethod, StepId, StepImage, UploadedImage,
};
use futures_util::future::try_join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Sent as `info` when the draft has no description.
pub const DEFAULT_INFO: &str = "No information available";

/// Phase of the current submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadPhase {
    Idle,
    Validating,
    UploadingSteps,
    CreatingRecipe,
    UploadingCover,
    Reconciling,
    /// Validation refused the draft; nothing was sent
    Aborted,
}

/// Input to the phase transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadEvent {
    Submit,
    ValidationPassed,
    ValidationFailed,
    StepsUploaded,
    RecipeCreated,
    CoverUploaded,
    Reconciled,
    Failed,
}

impl UploadPhase {
    /// Apply `event`, or report it as invalid in this phase.
    pub fn transition(self, event: UploadEvent) -> Result<UploadPhase> {
        use UploadEvent as E;
        use UploadPhase as P;

        let next = match (self, event) {
            (P::Idle | P::Aborted, E::Submit) => P::Validating,
            (P::Validating, E::ValidationPassed) => P::UploadingSteps,
            (P::Validating, E::ValidationFailed) => P::Aborted,
            (P::UploadingSteps, E::StepsUploaded) => P::CreatingRecipe,
            (P::CreatingRecipe, E::RecipeCreated) => P::UploadingCover,
            (P::UploadingCover, E::CoverUploaded) => P::Reconciling,
            (P::Reconciling, E::Reconciled) => P::Idle,
            (P::UploadingSteps | P::CreatingRecipe | P::UploadingCover, E::Failed) => P::Idle,
            (from, event) => return Err(ClientError::InvalidTransition { from, event }),
        };
        Ok(next)
    }

    /// Whether a submission is running.
    pub fn is_busy(self) -> bool {
        !matches!(self, UploadPhase::Idle | UploadPhase::Aborted)
    }
}

/// What a finished submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub recipe_id: RecipeId,
    /// Step images uploaded by this submission
    pub step_uploads: usize,
    /// Whether a new cover was uploaded (an unchanged remote cover is kept)
    pub cover_uploaded: bool,
    /// Reconcile fetches that failed; the recipe itself is saved
    pub reconcile_errors: Vec<String>,
}

/// Runs recipe submissions one at a time.
pub struct UploadOrchestrator {
    client: Arc<CookMeClient>,
    session: Arc<SessionStore>,
    lists: Arc<ListCaches>,
    phase: watch::Sender<UploadPhase>,
}

impl UploadOrchestrator {
    pub fn new(client: Arc<CookMeClient>, session: Arc<SessionStore>, lists: Arc<ListCaches>) -> Self {
        let (phase, _) = watch::channel(UploadPhase::Idle);
        Self {
            client,
            session,
            lists,
            phase,
        }
    }

    /// Receive every phase change.
    pub fn subscribe(&self) -> watch::Receiver<UploadPhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> UploadPhase {
        *self.phase.borrow()
    }

    /// Submit a draft.
    ///
    /// Returns [`ClientError::SubmissionInProgress`] without touching the
    /// running submission when one is already in flight. Dropping the
    /// returned future mid-flight releases the slot.
    pub async fn submit(&self, draft: &RecipeDraft) -> Result<SubmissionReport> {
        let mut slot = SubmissionSlot::claim(&self.phase)?;

        if let Err(e) = draft.validate() {
            info!(reason = %e, "Draft refused");
            self.advance(UploadEvent::ValidationFailed)?;
            slot.release();
            return Err(e.into());
        }
        self.advance(UploadEvent::ValidationPassed)?;

        let result = self.run(draft).await;
        if let Err(e) = &result {
            error!(phase = ?self.phase(), error = %e, "Recipe submission failed");
            self.fail();
        }
        slot.release();
        result
    }

    async fn run(&self, draft: &RecipeDraft) -> Result<SubmissionReport> {
        let upload = self.client.upload().await?;
        let uploads = upload.client();

        // Steps
        let pending: Vec<_> = draft
            .steps()
            .iter()
            .filter_map(|step| step.pending_image().map(|image| (step.id.clone(), image)))
            .collect();
        debug!(steps = draft.steps().len(), images = pending.len(), "Uploading step images");

        let uploaded: HashMap<_, _> = try_join_all(pending.into_iter().map(|(id, image)| {
            let uploads = &uploads;
            async move { uploads.upload_step_image(image).await.map(|hosted| (id, hosted)) }
        }))
        .await?
        .into_iter()
        .collect();
        let step_uploads = uploaded.len();
        self.advance(UploadEvent::StepsUploaded)?;

        // Create or update
        let request = create_request(draft, &uploaded);
        let recipes = self.client.recipes().await?;
        let recipe_id = recipes.client().create_recipe(&request).await?;
        self.advance(UploadEvent::RecipeCreated)?;

        // Cover
        let cover_uploaded = match draft.cover() {
            Some(CoverImage::Local(image)) => {
                uploads
                    .upload_cover_image(&recipe_id, image)
                    .await
                    .map_err(|e| ClientError::CoverUploadFailed {
                        recipe_id: recipe_id.clone(),
                        source: Box::new(e),
                    })?;
                true
            }
            Some(CoverImage::Remote { .. }) | None => {
                debug!(recipe_id = %recipe_id, "Keeping existing cover");
                false
            }
        };
        self.advance(UploadEvent::CoverUploaded)?;

        let reconcile_errors = self.reconcile().await;
        self.advance(UploadEvent::Reconciled)?;

        info!(
            recipe_id = %recipe_id,
            step_uploads,
            cover_uploaded,
            reconcile_failures = reconcile_errors.len(),
            "Recipe submitted"
        );

        Ok(SubmissionReport {
            recipe_id,
            step_uploads,
            cover_uploaded,
            reconcile_errors,
        })
    }

    /// Re-fetch the profile and the lists a new recipe shows up in.
    async fn reconcile(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Err(e) = self.session.refresh_profile().await {
            warn!(error = %e, "Reconcile: profile refresh failed");
            errors.push(format!("profile: {}", e));
        }

        for kind in [ListKind::Mine, ListKind::Favorites, ListKind::Recent] {
            if let Err(e) = self.lists.refresh(kind).await {
                errors.push(format!("{}: {}", kind, e));
            }
        }

        errors
    }

    fn advance(&self, event: UploadEvent) -> Result<()> {
        let next = self.phase().transition(event)?;
        debug!(?event, phase = ?next, "Upload phase");
        self.phase.send_replace(next);
        Ok(())
    }

    fn fail(&self) {
        reset(&self.phase);
    }
}

/// Moves the phase back to idle after a failure.
///
/// Reconciling has no `Failed` edge; it also lands on idle.
fn reset(phase: &watch::Sender<UploadPhase>) {
    let current = *phase.borrow();
    let next = current
        .transition(UploadEvent::Failed)
        .unwrap_or(UploadPhase::Idle);
    phase.send_replace(next);
}

/// The running submission's hold on the phase channel.
///
/// Until released, dropping the slot resets the phase, so a cancelled
/// submission does not block the next one.
struct SubmissionSlot<'a> {
    phase: &'a watch::Sender<UploadPhase>,
    armed: bool,
}

impl<'a> SubmissionSlot<'a> {
    fn claim(phase: &'a watch::Sender<UploadPhase>) -> Result<Self> {
        let claimed = phase.send_if_modified(|current| match current.transition(UploadEvent::Submit) {
            Ok(next) => {
                *current = next;
                true
            }
            Err(_) => false,
        });

        if claimed {
            Ok(Self { phase, armed: true })
        } else {
            warn!(phase = ?*phase.borrow(), "Submission rejected: another is in progress");
            Err(ClientError::SubmissionInProgress)
        }
    }

    fn release(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmissionSlot<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(phase = ?*self.phase.borrow(), "Submission dropped before finishing");
            reset(self.phase);
        }
    }
}

/// Build the create/update body from a validated draft.
fn create_request(
    draft: &RecipeDraft,
    uploaded: &HashMap<StepId, UploadedImage>,
) -> CreateRecipeRequest {
    let methods = draft
        .steps()
        .iter()
        .map(|step| method_for(step, uploaded.get(&step.id)))
        .collect();

    let info = if draft.description().trim().is_empty() {
        DEFAULT_INFO.to_string()
    } else {
        draft.description().to_string()
    };

    CreateRecipeRequest {
        id: draft
            .recipe_id()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default(),
        title: draft.title().trim().to_string(),
        info,
        ingredients: draft.ingredients().to_vec(),
        categories: draft.categories().to_vec(),
        methods,
    }
}

fn method_for(step: &DraftStep, fresh: Option<&UploadedImage>) -> RecipeMethod {
    let hosted = fresh.or(match &step.image {
        Some(StepImage::Uploaded(existing)) => Some(existing),
        _ => None,
    });

    RecipeMethod {
        value: step.value.clone(),
        number: step.number,
        secure_url: hosted.map(|h| h.secure_url.clone()),
        public_id: hosted.and_then(|h| h.public_id.clone()),
    }
}
