use crate::client::api::{BookingApi, SubmissionError};
use crate::models::{BookingRequest, Frequency, Language, TimeOfDay};
use crate::services::pricing::{self, PlanTier};

/// Seconds the success screen stays up before the UI navigates home.
pub const SUCCESS_REDIRECT_SECS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Contact,
    Service,
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success { countdown: u8 },
    Failed,
}

/// Which contact fields are currently marked invalid. Email and phone are
/// a pair: both get marked when neither is filled, and editing either
/// clears both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: bool,
    pub email: bool,
    pub phone: bool,
    pub address: bool,
}

impl FieldErrors {
    pub fn any(&self) -> bool {
        self.name || self.email || self.phone || self.address
    }
}

/// The three-step booking funnel. Values survive back-navigation and
/// failed submissions; nothing leaves this struct until `begin_submit`
/// hands out a validated request.
pub struct BookingForm {
    language: Language,
    step: Step,
    status: SubmitStatus,
    errors: FieldErrors,
    agreed_to_terms: bool,

    name: String,
    email: String,
    phone: String,
    address: String,
    num_cats: u32,
    frequency: Frequency,
    time_of_day: TimeOfDay,
    notes: String,
    plan: String,
}

impl BookingForm {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            step: Step::Contact,
            status: SubmitStatus::Idle,
            errors: FieldErrors::default(),
            agreed_to_terms: false,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            num_cats: 1,
            frequency: Frequency::PerWeek(1),
            time_of_day: TimeOfDay::Morning,
            notes: String::new(),
            plan: "Essential".to_string(),
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn errors(&self) -> FieldErrors {
        self.errors
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    pub fn num_cats(&self) -> u32 {
        self.num_cats
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn agreed_to_terms(&self) -> bool {
        self.agreed_to_terms
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.errors.name = false;
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.errors.email = false;
        self.errors.phone = false;
    }

    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone = value.into();
        self.errors.email = false;
        self.errors.phone = false;
    }

    pub fn set_address(&mut self, value: impl Into<String>) {
        self.address = value.into();
        self.errors.address = false;
    }

    pub fn set_num_cats(&mut self, count: u32) {
        self.num_cats = count.max(1);
    }

    pub fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
    }

    pub fn set_time_of_day(&mut self, time_of_day: TimeOfDay) {
        self.time_of_day = time_of_day;
    }

    pub fn set_notes(&mut self, value: impl Into<String>) {
        self.notes = value.into();
    }

    pub fn set_agreed_to_terms(&mut self, agreed: bool) {
        self.agreed_to_terms = agreed;
    }

    /// Rewrites the free-form plan label: localized tier name plus the
    /// discount badge for the current frequency, e.g. "Care Plus (5% OFF)".
    pub fn select_plan(&mut self, tier: PlanTier) {
        let base = tier.label(self.language);
        self.plan = match self.current_badge() {
            Some(badge) => format!("{base} ({})", badge.label()),
            None => base.to_string(),
        };
    }

    fn current_badge(&self) -> Option<pricing::DiscountBadge> {
        match self.frequency {
            Frequency::PerWeek(n) => pricing::discount_badge(n),
            Frequency::Custom => None,
        }
    }

    /// Weekly total for the currently selected options, as shown on step 2
    /// and on the confirmation step. Same function the server uses for the
    /// emails, so the preview can never drift.
    pub fn price_preview(&self) -> String {
        pricing::compute_price(
            PlanTier::from_label(&self.plan),
            self.num_cats,
            self.frequency,
        )
        .display(self.language)
    }

    fn validate_contact(&mut self) -> bool {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.name = true;
        }
        if self.address.trim().is_empty() {
            errors.address = true;
        }
        if self.email.trim().is_empty() && self.phone.trim().is_empty() {
            errors.email = true;
            errors.phone = true;
        }
        self.errors = errors;
        !errors.any()
    }

    /// Advances one step. Contact details must validate before the service
    /// step; the confirmation step is reachable unconditionally because
    /// every service field has a default.
    pub fn next(&mut self) {
        match self.step {
            Step::Contact => {
                if self.validate_contact() {
                    self.step = Step::Service;
                }
            }
            Step::Service => self.step = Step::Confirm,
            Step::Confirm => {}
        }
    }

    /// Always allowed outside an in-flight submit; keeps all entered
    /// values and clears error marks.
    pub fn back(&mut self) {
        if self.status == SubmitStatus::Submitting {
            return;
        }
        self.errors = FieldErrors::default();
        self.step = match self.step {
            Step::Contact => Step::Contact,
            Step::Service => Step::Contact,
            Step::Confirm => Step::Service,
        };
    }

    pub fn can_submit(&self) -> bool {
        self.step == Step::Confirm
            && self.agreed_to_terms
            && self.status != SubmitStatus::Submitting
            && !matches!(self.status, SubmitStatus::Success { .. })
    }

    /// Starts a submission: gate checks, a final contact re-validation
    /// (bouncing back to step 1 on violation), then hands out the request
    /// to send. Returns `None` when nothing should be sent.
    pub fn begin_submit(&mut self) -> Option<BookingRequest> {
        if !self.can_submit() {
            return None;
        }
        if !self.validate_contact() {
            self.step = Step::Contact;
            return None;
        }
        self.status = SubmitStatus::Submitting;
        Some(self.request())
    }

    pub fn complete_submit(&mut self, result: Result<(), SubmissionError>) {
        self.status = match result {
            Ok(()) => SubmitStatus::Success {
                countdown: SUCCESS_REDIRECT_SECS,
            },
            Err(_) => SubmitStatus::Failed,
        };
    }

    /// One submission call per invocation; no automatic retry. Returns
    /// whether the submission succeeded.
    pub async fn submit(&mut self, api: &BookingApi) -> bool {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let result = api.submit(&request).await;
        self.complete_submit(result);
        matches!(self.status, SubmitStatus::Success { .. })
    }

    /// Advances the success countdown by one second. Returns true once the
    /// UI should navigate away.
    pub fn tick(&mut self) -> bool {
        if let SubmitStatus::Success { countdown } = &mut self.status {
            if *countdown > 0 {
                *countdown -= 1;
            }
            return *countdown == 0;
        }
        false
    }

    fn optional(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn request(&self) -> BookingRequest {
        BookingRequest {
            name: self.name.trim().to_string(),
            email: Self::optional(&self.email),
            phone: Self::optional(&self.phone),
            address: self.address.trim().to_string(),
            num_cats: self.num_cats,
            frequency: self.frequency,
            plan: self.plan.clone(),
            time_of_day: self.time_of_day,
            notes: Self::optional(&self.notes),
            language: self.language,
        }
    }
}
