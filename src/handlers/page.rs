//! HTML form handlers

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    Form,
};

use crate::models::{InputError, RiskTrack};
use crate::pipeline::{self, SubmissionError, SubmissionOutcome};
use crate::view::{self, PageForm, PageView};
use crate::AppState;

/// Empty form with default values
pub async fn index() -> Html<String> {
    Html(view::render_page(&PageView::default()))
}

/// Handle the "Predict ... Risk" button of track `T` and re-render the page
/// with every posted value kept
pub async fn submit<T>(
    State(state): State<AppState>,
    form: Result<Form<PageForm>, FormRejection>,
) -> (StatusCode, Html<String>)
where
    T: RiskTrack + 'static,
{
    let (mut page, result) = match form {
        Ok(Form(form)) => {
            let page = PageView::for_form(&form, T::TRACK);
            (page, run::<T>(&state, &form).await)
        }
        Err(rejection) => {
            tracing::warn!(track = T::TRACK.as_str(), "Rejected form submission: {}", rejection);
            let page = PageView {
                active: Some(T::TRACK),
                ..PageView::default()
            };
            let err = SubmissionError::Invalid(InputError::Malformed(rejection.body_text()));
            (page, Err(err))
        }
    };

    let status = match result {
        Ok(outcome) => {
            page.notices = view::outcome_notices(&outcome);
            StatusCode::OK
        }
        Err(err) => {
            page.notices = view::error_notices(&err);
            error_status(&err)
        }
    };

    (status, Html(view::render_page(&page)))
}

async fn run<T: RiskTrack>(state: &AppState, form: &PageForm) -> Result<SubmissionOutcome, SubmissionError> {
    let input: T = form.input()?;
    pipeline::submit(state, &input).await
}

fn error_status(err: &SubmissionError) -> StatusCode {
    match err {
        SubmissionError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionError::Model(_) | SubmissionError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        SubmissionError::Gateway(_) => StatusCode::BAD_GATEWAY,
    }
}
