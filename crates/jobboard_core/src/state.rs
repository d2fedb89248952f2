use std::collections::BTreeSet;

use crate::filter::filter_and_sort;
use crate::view_model::{format_salary, AppViewModel, JobRowView};
use crate::{
    Application, ApplicationRowView, ApplicationStatus, ApplicationView, Id, JobFilter, JobView,
    SavedSet, SortKey,
};

/// Who is using the client, as far as the page logic cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Id,
    pub display_name: String,
    pub candidate_id: Option<Id>,
    pub employer_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    viewer: Option<Viewer>,
    jobs: Vec<JobView>,
    jobs_status: PageStatus,
    saved: SavedSet,
    pending_bookmarks: BTreeSet<Id>,
    filter: JobFilter,
    sort: Option<SortKey>,
    applications: Vec<ApplicationView>,
    applications_status: PageStatus,
    pending_mutations: usize,
    notice: Option<String>,
    signed_out: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let visible = filter_and_sort(&self.jobs, &self.filter, self.sort);
        let jobs = visible
            .iter()
            .map(|item| JobRowView {
                job_id: item.job.id.clone(),
                title: item.job.title.clone(),
                company: item.company_name().map(ToOwned::to_owned),
                location: item.location_name().map(ToOwned::to_owned),
                category: item.category.as_ref().map(|category| category.name.clone()),
                salary: format_salary(&item.job),
                employment_type: item.job.employment_type,
                updated_at: item.job.updated_at,
                is_saved: self.saved.contains(&item.job.id),
                bookmark_pending: self.pending_bookmarks.contains(&item.job.id),
            })
            .collect();

        AppViewModel {
            signed_in_as: self.viewer.as_ref().map(|viewer| viewer.display_name.clone()),
            jobs_status: self.jobs_status.clone(),
            jobs,
            total_jobs: self.jobs.len(),
            filter_active: !self.filter.is_empty(),
            saved_count: self.saved.len(),
            applications_status: self.applications_status.clone(),
            applications: self
                .applications
                .iter()
                .map(ApplicationRowView::from)
                .collect(),
            notice: self.notice.clone(),
            signed_out: self.signed_out,
            dirty: self.dirty,
        }
    }

    /// True while any request issued through an effect has not been answered.
    pub fn is_busy(&self) -> bool {
        self.jobs_status == PageStatus::Loading
            || self.applications_status == PageStatus::Loading
            || !self.pending_bookmarks.is_empty()
            || self.pending_mutations > 0
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    pub fn candidate_id(&self) -> Option<&Id> {
        self.viewer.as_ref().and_then(|viewer| viewer.candidate_id.as_ref())
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    pub fn saved(&self) -> &SavedSet {
        &self.saved
    }

    pub(crate) fn filter_mut(&mut self) -> &mut JobFilter {
        &mut self.filter
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_viewer(&mut self, viewer: Option<Viewer>) {
        self.signed_out = false;
        self.viewer = viewer;
        self.mark_dirty();
    }

    pub(crate) fn begin_jobs_load(&mut self) {
        self.jobs_status = PageStatus::Loading;
        self.mark_dirty();
    }

    pub(crate) fn apply_jobs(&mut self, result: Result<Vec<JobView>, String>) {
        match result {
            Ok(jobs) => {
                self.jobs = jobs;
                self.jobs_status = PageStatus::Ready;
            }
            Err(message) => {
                self.jobs.clear();
                self.jobs_status = PageStatus::Failed(message);
            }
        }
        self.mark_dirty();
    }

    pub(crate) fn begin_mutation(&mut self) {
        self.pending_mutations += 1;
    }

    pub(crate) fn finish_mutation(&mut self) {
        self.pending_mutations = self.pending_mutations.saturating_sub(1);
    }

    pub(crate) fn replace_saved(&mut self, saved: SavedSet) {
        self.saved = saved;
        self.mark_dirty();
    }

    pub(crate) fn set_sort(&mut self, sort: Option<SortKey>) {
        self.sort = sort;
        self.mark_dirty();
    }

    pub(crate) fn clear_filters(&mut self) {
        self.filter = JobFilter::default();
        self.mark_dirty();
    }

    /// Marks a bookmark toggle as in flight; false if one already is.
    pub(crate) fn start_bookmark(&mut self, job_id: Id) -> bool {
        let started = self.pending_bookmarks.insert(job_id);
        if started {
            self.mark_dirty();
        }
        started
    }

    pub(crate) fn settle_bookmark(&mut self, job_id: &Id, result: Result<bool, String>) {
        if !self.pending_bookmarks.remove(job_id) {
            // Stale reply from before a session reset.
            return;
        }
        match result {
            Ok(true) => {
                self.saved.insert(job_id.clone());
            }
            Ok(false) => {
                self.saved.remove(job_id);
            }
            Err(message) => self.notice = Some(message),
        }
        self.mark_dirty();
    }

    pub(crate) fn begin_applications_load(&mut self) {
        self.applications_status = PageStatus::Loading;
        self.mark_dirty();
    }

    pub(crate) fn apply_applications(&mut self, result: Result<Vec<ApplicationView>, String>) {
        match result {
            Ok(applications) => {
                self.applications = applications;
                self.applications_status = PageStatus::Ready;
            }
            Err(message) => {
                self.applications.clear();
                self.applications_status = PageStatus::Failed(message);
            }
        }
        self.mark_dirty();
    }

    /// Status of a loaded application, if it is on the current page.
    pub(crate) fn application_status(&self, application_id: &Id) -> Option<ApplicationStatus> {
        self.applications
            .iter()
            .find(|view| &view.application.id == application_id)
            .map(|view| view.application.status)
    }

    /// Swaps in the updated application record, keeping its joined job.
    pub(crate) fn apply_application_update(&mut self, updated: Application) {
        if let Some(view) = self
            .applications
            .iter_mut()
            .find(|view| view.application.id == updated.id)
        {
            view.application = updated;
        }
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
        self.mark_dirty();
    }

    /// Drops everything tied to the current session.
    pub(crate) fn sign_out(&mut self) {
        *self = AppState {
            signed_out: true,
            notice: Some("Your session has expired. Please sign in again.".to_string()),
            dirty: true,
            ..AppState::default()
        };
    }
}
