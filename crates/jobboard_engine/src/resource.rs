use std::fmt;

/// Collections exposed by the data API, each at `/{path}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    UserProfiles,
    Candidates,
    Employers,
    JobPosts,
    JobCategories,
    Categories,
    JobLocations,
    Locations,
    SavedJobs,
    Applications,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::UserProfiles => "userProfiles",
            Resource::Candidates => "candidates",
            Resource::Employers => "employers",
            Resource::JobPosts => "jobPosts",
            Resource::JobCategories => "jobCategories",
            Resource::Categories => "categories",
            Resource::JobLocations => "jobLocations",
            Resource::Locations => "locations",
            Resource::SavedJobs => "savedJobs",
            Resource::Applications => "applications",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
