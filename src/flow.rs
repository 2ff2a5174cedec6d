//! Screen-flow state machine for clients of the scanning workflow.
//!
//! A pure reducer over the five-screen sequence
//! `Welcome → Camera → Confirmation → Loading → Recipe`. Failure actions
//! revert to the screen the user came from; actions that do not apply to
//! the current screen leave the state unchanged.

use crate::models::{DetectedItem, RecipeCard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Camera,
    Confirmation,
    Loading,
    Recipe,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowState {
    pub screen: Screen,
    pub captured_image: Option<String>,
    pub detected_items: Vec<DetectedItem>,
    pub selected_ingredients: Vec<String>,
    pub recipes: Vec<RecipeCard>,
}

impl Default for FlowState {
    fn default() -> Self {
        Self {
            screen: Screen::Welcome,
            captured_image: None,
            detected_items: Vec::new(),
            selected_ingredients: Vec::new(),
            recipes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    StartScanning,
    CaptureImage(String),
    DetectionSucceeded(Vec<DetectedItem>),
    DetectionFailed,
    ConfirmIngredients(Vec<String>),
    GenerationSucceeded(Vec<RecipeCard>),
    GenerationFailed,
    Retake,
    Back,
    StartOver,
}

pub fn reduce(state: FlowState, action: Action) -> FlowState {
    match (state.screen, action) {
        (Screen::Welcome, Action::StartScanning) => FlowState {
            screen: Screen::Camera,
            ..state
        },
        (Screen::Camera, Action::CaptureImage(image)) => FlowState {
            screen: Screen::Loading,
            captured_image: Some(image),
            ..state
        },
        (Screen::Loading, Action::DetectionSucceeded(items)) => FlowState {
            screen: Screen::Confirmation,
            detected_items: items,
            ..state
        },
        (Screen::Loading, Action::DetectionFailed) => FlowState {
            screen: Screen::Camera,
            ..state
        },
        (Screen::Confirmation, Action::ConfirmIngredients(ingredients)) => FlowState {
            screen: Screen::Loading,
            selected_ingredients: ingredients,
            ..state
        },
        (Screen::Loading, Action::GenerationSucceeded(recipes)) => FlowState {
            screen: Screen::Recipe,
            recipes,
            ..state
        },
        (Screen::Loading, Action::GenerationFailed) => FlowState {
            screen: Screen::Confirmation,
            ..state
        },
        (Screen::Confirmation, Action::Retake) => FlowState {
            screen: Screen::Camera,
            ..state
        },
        (Screen::Camera, Action::Back) => FlowState {
            screen: Screen::Welcome,
            ..state
        },
        (Screen::Recipe, Action::Back) => FlowState {
            screen: Screen::Confirmation,
            ..state
        },
        (_, Action::StartOver) => FlowState::default(),
        // Anything else is a no-op for the current screen.
        (_, _) => state,
    }
}
