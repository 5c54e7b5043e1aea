use std::future::Future;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Element, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
};

use crate::config::{SiteCopy, SUBMIT_DELAY_MS};
use crate::dom;
use crate::error::{DomError, SubmitError};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Goal,
    Message,
    Consent,
}

impl Field {
    pub fn label(self, copy: &SiteCopy) -> &'static str {
        match self {
            Field::Name => copy.name_label,
            Field::Email => copy.email_label,
            Field::Goal => copy.goal_label,
            Field::Message => copy.message_label,
            Field::Consent => copy.consent_label,
        }
    }
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Length in UTF-16 code units, the unit browsers report for input values.
fn trimmed_len(value: &str) -> usize {
    value.trim().encode_utf16().count()
}

/// Snapshot of the contact form's field values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub goal: String,
    pub message: String,
    pub consent: bool,
}

impl ContactForm {
    /// Failing fields in form order.
    pub fn invalid_fields(&self) -> Vec<Field> {
        let checks = [
            (Field::Name, trimmed_len(&self.name) >= 2),
            (Field::Email, is_email(&self.email)),
            (Field::Goal, !self.goal.is_empty()),
            (Field::Message, trimmed_len(&self.message) >= 10),
            (Field::Consent, self.consent),
        ];
        checks
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(field, _)| field)
            .collect()
    }

    pub fn validate(&self) -> Result<(), Vec<Field>> {
        let invalid = self.invalid_fields();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(invalid)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormStatus {
    Invalid(Vec<Field>),
    Sending,
    Sent,
    Failed,
}

impl FormStatus {
    pub fn message(&self, copy: &SiteCopy) -> String {
        match self {
            FormStatus::Invalid(fields) => {
                let labels: Vec<&str> = fields.iter().map(|f| f.label(copy)).collect();
                format!("{}: {}", copy.missing_prefix, labels.join(", "))
            }
            FormStatus::Sending => copy.sending.to_string(),
            FormStatus::Sent => copy.sent.to_string(),
            FormStatus::Failed => copy.failed.to_string(),
        }
    }
}

/// What the submit flow needs from the form on the page.
pub trait FormSurface {
    fn read(&self) -> ContactForm;
    fn show(&self, status: &str);
    fn mark_error(&self, on: bool);
    fn reset(&self);
}

/// Validates, then waits on `delivery` in place of a network call. The form is
/// only cleared after a successful delivery.
pub async fn submit<S, D>(surface: &S, copy: &SiteCopy, delivery: D) -> FormStatus
where
    S: FormSurface + ?Sized,
    D: Future<Output = Result<(), SubmitError>>,
{
    if let Err(fields) = surface.read().validate() {
        let status = FormStatus::Invalid(fields);
        surface.show(&status.message(copy));
        surface.mark_error(true);
        return status;
    }

    surface.mark_error(false);
    surface.show(&FormStatus::Sending.message(copy));
    let status = match delivery.await {
        Ok(()) => FormStatus::Sent,
        Err(e) => {
            warn!("contact form: {}", e);
            FormStatus::Failed
        }
    };
    surface.show(&status.message(copy));
    if status == FormStatus::Sent {
        surface.reset();
    }
    status
}

async fn simulated_delivery() -> Result<(), SubmitError> {
    TimeoutFuture::new(SUBMIT_DELAY_MS).await;
    Ok(())
}

struct PageForm {
    form: HtmlFormElement,
    status: Element,
    name: HtmlInputElement,
    email: HtmlInputElement,
    goal: HtmlSelectElement,
    message: HtmlTextAreaElement,
    consent: HtmlInputElement,
}

impl PageForm {
    fn resolve() -> Result<Self, DomError> {
        let form: HtmlFormElement = dom::query("#contactForm")?;
        Ok(Self {
            status: dom::query_in(&form, ".form-status")?,
            name: dom::query("#name")?,
            email: dom::query("#email")?,
            goal: dom::query("#goal")?,
            message: dom::query("#message")?,
            consent: dom::query("#consent")?,
            form,
        })
    }
}

impl FormSurface for PageForm {
    fn read(&self) -> ContactForm {
        ContactForm {
            name: self.name.value(),
            email: self.email.value(),
            goal: self.goal.value(),
            message: self.message.value(),
            consent: self.consent.checked(),
        }
    }

    fn show(&self, status: &str) {
        self.status.set_text_content(Some(status));
    }

    fn mark_error(&self, on: bool) {
        dom::set_class(&self.form, "error", on);
    }

    fn reset(&self) {
        self.form.reset();
    }
}

pub fn attach(copy: &SiteCopy) -> Result<(), DomError> {
    let page = Rc::new(PageForm::resolve()?);
    let copy = Rc::new(copy.clone());
    let target = page.form.clone();
    dom::on(&target, "submit", move |event| {
        event.prevent_default();
        let page = page.clone();
        let copy = copy.clone();
        spawn_local(async move {
            let status = submit(&*page, &copy, simulated_delivery()).await;
            info!("contact form: {:?}", status);
        });
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::executor::block_on;

    use super::*;

    #[derive(Default)]
    struct FakeForm {
        values: RefCell<ContactForm>,
        statuses: RefCell<Vec<String>>,
        error: RefCell<bool>,
    }

    impl FakeForm {
        fn with(values: ContactForm) -> Self {
            Self {
                values: RefCell::new(values),
                ..Self::default()
            }
        }
    }

    impl FormSurface for FakeForm {
        fn read(&self) -> ContactForm {
            self.values.borrow().clone()
        }

        fn show(&self, status: &str) {
            self.statuses.borrow_mut().push(status.to_string());
        }

        fn mark_error(&self, on: bool) {
            *self.error.borrow_mut() = on;
        }

        fn reset(&self) {
            *self.values.borrow_mut() = ContactForm::default();
        }
    }

    fn valid() -> ContactForm {
        ContactForm {
            name: "Jon Jonsson".to_string(),
            email: "jon@example.com".to_string(),
            goal: "weight-loss".to_string(),
            message: "Ég vil byrja að æfa reglulega".to_string(),
            consent: true,
        }
    }

    async fn delivered() -> Result<(), SubmitError> {
        Ok(())
    }

    #[test]
    fn email_shape() {
        assert!(is_email("jon@example.com"));
        assert!(is_email("a@b.c"));
        assert!(is_email("first.last@mail.example.is"));
        assert!(!is_email("jon@example"));
        assert!(!is_email("jon example@x.is"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("jon@@example.com"));
        assert!(!is_email(""));
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn lengths_are_checked_after_trimming() {
        let mut form = valid();
        form.name = "  J  ".to_string();
        form.message = "   stutt   ".to_string();
        assert_eq!(form.invalid_fields(), vec![Field::Name, Field::Message]);

        form.name = "Jó".to_string();
        form.message = "Æfingar!!!".to_string();
        assert_eq!(form.invalid_fields(), vec![]);
    }

    #[test]
    fn astral_characters_count_as_two_units() {
        let mut form = valid();
        form.name = "💪".to_string();
        form.message = "🏋️💪🔥🥗".to_string();
        assert_eq!(trimmed_len(&form.name), 2);
        assert_eq!(form.invalid_fields(), vec![Field::Message]);

        form.message = "💪💪💪💪💪".to_string();
        assert_eq!(form.invalid_fields(), vec![]);
    }

    #[test]
    fn every_subset_of_invalid_fields_is_reported_in_order() {
        let all = [
            Field::Name,
            Field::Email,
            Field::Goal,
            Field::Message,
            Field::Consent,
        ];
        for mask in 0u8..32 {
            let mut form = valid();
            let mut expected = Vec::new();
            for (bit, field) in all.iter().enumerate() {
                if mask & (1 << bit) == 0 {
                    continue;
                }
                expected.push(*field);
                match field {
                    Field::Name => form.name = "J".to_string(),
                    Field::Email => form.email = "jon.example.com".to_string(),
                    Field::Goal => form.goal.clear(),
                    Field::Message => form.message = "hæ".to_string(),
                    Field::Consent => form.consent = false,
                }
            }
            assert_eq!(form.invalid_fields(), expected, "mask {:05b}", mask);
        }
    }

    #[test]
    fn invalid_submission_lists_labels_and_keeps_values() {
        let copy = SiteCopy::english();
        let mut values = valid();
        values.email = "jon".to_string();
        values.consent = false;
        let fake = FakeForm::with(values.clone());

        let status = block_on(submit(&fake, &copy, delivered()));

        assert_eq!(status, FormStatus::Invalid(vec![Field::Email, Field::Consent]));
        assert_eq!(*fake.statuses.borrow(), vec!["Missing: Email, Consent".to_string()]);
        assert!(*fake.error.borrow());
        assert_eq!(fake.read(), values);
    }

    #[test]
    fn empty_form_uses_icelandic_labels_by_default() {
        let fake = FakeForm::default();
        block_on(submit(&fake, &SiteCopy::default(), delivered()));
        assert_eq!(
            *fake.statuses.borrow(),
            vec!["Vantar: Nafn, Netfang, Markmið, Skilaboð, Samþykki".to_string()]
        );
    }

    #[test]
    fn valid_submission_sends_then_succeeds_and_resets() {
        let copy = SiteCopy::english();
        let fake = FakeForm::with(valid());
        *fake.error.borrow_mut() = true;

        let status = block_on(submit(&fake, &copy, delivered()));

        assert_eq!(status, FormStatus::Sent);
        assert_eq!(
            *fake.statuses.borrow(),
            vec![copy.sending.to_string(), copy.sent.to_string()]
        );
        assert!(!*fake.error.borrow());
        assert_eq!(fake.read(), ContactForm::default());
    }

    #[test]
    fn failed_delivery_keeps_values_and_asks_to_retry() {
        let copy = SiteCopy::default();
        let fake = FakeForm::with(valid());

        let status = block_on(submit(&fake, &copy, async {
            Err::<(), _>(SubmitError::Failed("offline".to_string()))
        }));

        assert_eq!(status, FormStatus::Failed);
        assert_eq!(
            fake.statuses.borrow().last().map(String::as_str),
            Some("Villa kom upp. Reyndu aftur.")
        );
        assert_eq!(fake.read(), valid());
    }
}
