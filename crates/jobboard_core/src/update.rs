use crate::{AppState, Effect, FilterChange, Msg, SavedSet};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionRestored(viewer) => {
            state.set_viewer(viewer);
            Vec::new()
        }
        Msg::JobBoardOpened => {
            state.begin_jobs_load();
            let mut effects = vec![Effect::LoadJobs];
            if let Some(candidate_id) = state.candidate_id().cloned() {
                state.begin_mutation();
                effects.push(Effect::LoadSavedJobs { candidate_id });
            }
            effects
        }
        Msg::JobsLoaded(result) => {
            state.apply_jobs(result);
            Vec::new()
        }
        Msg::SavedJobsLoaded(result) => {
            state.finish_mutation();
            match result {
                Ok(ids) => state.replace_saved(ids.into_iter().collect::<SavedSet>()),
                Err(message) => state.set_notice(message),
            }
            Vec::new()
        }
        Msg::FilterChanged(change) => {
            apply_filter_change(&mut state, change);
            Vec::new()
        }
        Msg::SortChanged(sort) => {
            state.set_sort(sort);
            Vec::new()
        }
        Msg::FiltersCleared => {
            state.clear_filters();
            Vec::new()
        }
        Msg::BookmarkClicked { job_id } => {
            let Some(candidate_id) = state.candidate_id().cloned() else {
                state.set_notice("Sign in as a candidate to save jobs.");
                return (state, Vec::new());
            };
            // A toggle for this job is still in flight; a second one would
            // race the first create/delete.
            if !state.start_bookmark(job_id.clone()) {
                return (state, Vec::new());
            }
            vec![Effect::ToggleBookmark {
                candidate_id,
                job_id,
            }]
        }
        Msg::BookmarkSettled { job_id, result } => {
            state.settle_bookmark(&job_id, result);
            Vec::new()
        }
        Msg::ApplicationsOpened => {
            let Some(candidate_id) = state.candidate_id().cloned() else {
                state.set_notice("Sign in as a candidate to see your applications.");
                return (state, Vec::new());
            };
            state.begin_applications_load();
            vec![Effect::LoadCandidateApplications { candidate_id }]
        }
        Msg::JobApplicationsOpened { job_id } => {
            if state.viewer().is_none() {
                state.set_notice("Sign in to review applications.");
                return (state, Vec::new());
            }
            state.begin_applications_load();
            vec![Effect::LoadJobApplications { job_id }]
        }
        Msg::ApplicationsLoaded(result) => {
            state.apply_applications(result);
            Vec::new()
        }
        Msg::ApplyClicked {
            job_id,
            cover_letter,
            resume_url,
        } => {
            let Some(candidate_id) = state.candidate_id().cloned() else {
                state.set_notice("Sign in as a candidate to apply.");
                return (state, Vec::new());
            };
            state.begin_mutation();
            vec![Effect::SubmitApplication {
                candidate_id,
                job_id,
                cover_letter,
                resume_url,
            }]
        }
        Msg::ApplicationSubmitted(result) => {
            state.finish_mutation();
            match result {
                Ok(application) => state.set_notice(format!(
                    "Application {} submitted for job {}.",
                    application.id, application.job_post_id
                )),
                Err(message) => state.set_notice(message),
            }
            Vec::new()
        }
        Msg::StatusChangeRequested {
            application_id,
            status,
            notes,
        } => {
            if state.viewer().is_none() {
                state.set_notice("Sign in to review applications.");
                return (state, Vec::new());
            }
            if let Some(current) = state
                .application_status(&application_id)
                .filter(|current| current.is_final())
            {
                state.set_notice(format!(
                    "Application {application_id} is already {}.",
                    current.label()
                ));
                return (state, Vec::new());
            }
            state.begin_mutation();
            vec![Effect::UpdateApplicationStatus {
                application_id,
                status,
                notes,
            }]
        }
        Msg::ApplicationUpdated(result) => {
            state.finish_mutation();
            match result {
                Ok(application) => {
                    let notice = format!(
                        "Application {} is now {}.",
                        application.id,
                        application.status.label()
                    );
                    state.apply_application_update(application);
                    state.set_notice(notice);
                }
                Err(message) => state.set_notice(message),
            }
            Vec::new()
        }
        Msg::SessionExpired => {
            state.sign_out();
            vec![Effect::ClearSession]
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_filter_change(state: &mut AppState, change: FilterChange) {
    let filter = state.filter_mut();
    match change {
        FilterChange::Query(query) => filter.query = query,
        FilterChange::Location(location) => filter.location = location,
        FilterChange::Category(category) => filter.category = category,
        FilterChange::Experience(experience) => filter.experience = experience,
        FilterChange::Salary(salary) => filter.salary = salary,
        FilterChange::Education(education) => filter.education = education,
        FilterChange::EmploymentType(kind) => filter.employment_type = kind,
    }
    state.mark_dirty();
}
