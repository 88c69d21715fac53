//! Test utilities shared by the provider crates.
//!
//! The main item is [`FakeGitLab`], an in-memory implementation of
//! [`gitlab_client::GitLabApi`]. It behaves closely enough to a GitLab instance for the
//! resource controllers to be exercised end to end: objects get IDs and computed fields,
//! path collisions are rejected, and every call is recorded so tests can assert on exactly
//! what was sent.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use gitlab_client::models::ObjectRef;
use gitlab_client::{
    Error, GitLabApi, Group, GroupCreatePayload, GroupUpdatePayload, Lookup, Namespace,
    NamespaceKind, Project, ProjectCreatePayload, ProjectTransferPayload, ProjectUpdatePayload,
    VisibilityLevel,
};
use tracing::debug;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Host name used in the URLs the fake generates.
pub const FAKE_HOST: &str = "gitlab.example.com";

/// ID of the personal namespace every fresh fake starts with.
pub const ROOT_NAMESPACE_ID: u64 = 1;

/// First ID handed out to created groups and projects.
const FIRST_OBJECT_ID: u64 = 100;

/// A single call made against the fake, with the payload it carried.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetGroup(u64),
    CreateGroup(GroupCreatePayload),
    UpdateGroup(u64, GroupUpdatePayload),
    DeleteGroup(u64),
    GetProject(u64),
    CreateProject(ProjectCreatePayload),
    UpdateProject(u64, ProjectUpdatePayload),
    TransferProject(u64, u64),
    DeleteProject(u64),
    ListNamespaces,
}

impl Call {
    /// Returns `true` for calls that change something on the remote side.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Call::GetGroup(_) | Call::GetProject(_) | Call::ListNamespaces
        )
    }
}

#[derive(Debug)]
struct FakeState {
    next_id: u64,
    groups: BTreeMap<u64, Group>,
    projects: BTreeMap<u64, Project>,
    namespaces: Vec<Namespace>,
    calls: Vec<Call>,
    failures: VecDeque<Error>,
    read_failures: VecDeque<Error>,
}

/// In-memory stand-in for a GitLab instance.
///
/// # Examples
///
/// ```rust
/// use gitlab_client::{GitLabApi, GroupCreatePayload};
/// use test_utils::{Call, FakeGitLab};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let gitlab = FakeGitLab::new();
/// let payload = GroupCreatePayload {
///     name: "infra".to_string(),
///     path: "infra".to_string(),
///     ..Default::default()
/// };
///
/// let group = gitlab.create_group(&payload).await.unwrap();
///
/// assert_eq!(gitlab.group(group.id).unwrap().path, "infra");
/// assert_eq!(gitlab.calls(), vec![Call::CreateGroup(payload)]);
/// # }
/// ```
#[derive(Debug)]
pub struct FakeGitLab {
    state: Mutex<FakeState>,
}

impl Default for FakeGitLab {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGitLab {
    /// Creates a fake holding only the personal namespace of the `root` user.
    pub fn new() -> Self {
        let root = Namespace {
            id: ROOT_NAMESPACE_ID,
            name: "root".to_string(),
            path: "root".to_string(),
            kind: NamespaceKind::User,
            full_path: Some("root".to_string()),
        };

        Self {
            state: Mutex::new(FakeState {
                next_id: FIRST_OBJECT_ID,
                groups: BTreeMap::new(),
                projects: BTreeMap::new(),
                namespaces: vec![root],
                calls: Vec::new(),
                failures: VecDeque::new(),
                read_failures: VecDeque::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake GitLab state lock poisoned")
    }

    /// Registers an extra namespace, e.g. a user namespace with no group behind it.
    pub fn add_namespace(&self, id: u64, name: &str, kind: NamespaceKind) {
        self.lock().namespaces.push(Namespace {
            id,
            name: name.to_string(),
            path: name.to_string(),
            kind,
            full_path: Some(name.to_string()),
        });
    }

    /// Makes the next call fail with `error`, whatever that call is.
    ///
    /// Queued failures are consumed in order, one per call.
    pub fn fail_next(&self, error: Error) {
        self.lock().failures.push_back(error);
    }

    /// Makes the next group or project `GET` fail with `error`, letting other calls through.
    ///
    /// Takes precedence over [`fail_next`](Self::fail_next) for that read.
    pub fn fail_next_read(&self, error: Error) {
        self.lock().read_failures.push_back(error);
    }

    /// Returns the stored group, if any.
    pub fn group(&self, id: u64) -> Option<Group> {
        self.lock().groups.get(&id).cloned()
    }

    /// Returns the stored project, if any.
    pub fn project(&self, id: u64) -> Option<Project> {
        self.lock().projects.get(&id).cloned()
    }

    /// Deletes a group behind the provider's back.
    pub fn remove_group(&self, id: u64) -> Option<Group> {
        let mut state = self.lock();
        state.namespaces.retain(|n| n.id != id);
        state.groups.remove(&id)
    }

    /// Deletes a project behind the provider's back.
    pub fn remove_project(&self, id: u64) -> Option<Project> {
        self.lock().projects.remove(&id)
    }

    /// Changes a stored group directly, without recording a call.
    pub fn edit_group<F>(&self, id: u64, edit: F)
    where
        F: FnOnce(&mut Group),
    {
        if let Some(group) = self.lock().groups.get_mut(&id) {
            edit(group);
        }
    }

    /// Changes a stored project directly, without recording a call.
    pub fn edit_project<F>(&self, id: u64, edit: F)
    where
        F: FnOnce(&mut Project),
    {
        if let Some(project) = self.lock().projects.get_mut(&id) {
            edit(project);
        }
    }

    /// Returns every call made so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Returns only the calls that change remote state.
    pub fn mutations(&self) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Records the call and pops a queued failure, if there is one.
    fn begin(&self, call: Call) -> Result<MutexGuard<'_, FakeState>, Error> {
        let mut state = self.lock();
        debug!(?call, "Fake GitLab call");
        let is_read = matches!(call, Call::GetGroup(_) | Call::GetProject(_));
        state.calls.push(call);
        let read_failure = if is_read {
            state.read_failures.pop_front()
        } else {
            None
        };
        let failure = read_failure.or_else(|| state.failures.pop_front());
        match failure {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl GitLabApi for FakeGitLab {
    async fn get_group(&self, id: u64) -> Lookup<Group> {
        let result = self.begin(Call::GetGroup(id)).and_then(|state| {
            state.groups.get(&id).cloned().ok_or(Error::NotFound)
        });
        Lookup::from_result(result)
    }

    async fn create_group(&self, payload: &GroupCreatePayload) -> Result<Group, Error> {
        let mut state = self.begin(Call::CreateGroup(payload.clone()))?;
        if state.groups.values().any(|g| g.path == payload.path) {
            return Err(path_taken("group"));
        }

        let id = state.allocate_id();
        let group = Group {
            id,
            name: payload.name.clone(),
            path: payload.path.clone(),
            description: Some(payload.description.clone().unwrap_or_default()),
            visibility_level: Some(payload.visibility_level.unwrap_or(VisibilityLevel::PRIVATE)),
            lfs_enabled: Some(payload.lfs_enabled.unwrap_or(true)),
            request_access_enabled: Some(payload.request_access_enabled.unwrap_or(false)),
            web_url: Some(group_web_url(&payload.path)),
            full_name: Some(payload.name.clone()),
            full_path: Some(payload.path.clone()),
        };

        state.namespaces.push(Namespace {
            id,
            name: group.name.clone(),
            path: group.path.clone(),
            kind: NamespaceKind::Group,
            full_path: group.full_path.clone(),
        });
        state.groups.insert(id, group.clone());
        Ok(group)
    }

    async fn update_group(&self, id: u64, payload: &GroupUpdatePayload) -> Result<Group, Error> {
        let mut state = self.begin(Call::UpdateGroup(id, payload.clone()))?;
        if let Some(path) = &payload.path {
            if state.groups.values().any(|g| g.id != id && &g.path == path) {
                return Err(path_taken("group"));
            }
        }

        let group = state.groups.get_mut(&id).ok_or(Error::NotFound)?;
        if let Some(name) = &payload.name {
            group.name = name.clone();
            group.full_name = Some(name.clone());
        }
        if let Some(path) = &payload.path {
            group.path = path.clone();
            group.full_path = Some(path.clone());
            group.web_url = Some(group_web_url(path));
        }
        if payload.description.is_some() {
            group.description = payload.description.clone();
        }
        if payload.lfs_enabled.is_some() {
            group.lfs_enabled = payload.lfs_enabled;
        }
        if payload.request_access_enabled.is_some() {
            group.request_access_enabled = payload.request_access_enabled;
        }
        if payload.visibility_level.is_some() {
            group.visibility_level = payload.visibility_level;
        }

        let group = group.clone();
        if let Some(namespace) = state.namespaces.iter_mut().find(|n| n.id == id) {
            namespace.name = group.name.clone();
            namespace.path = group.path.clone();
            namespace.full_path = group.full_path.clone();
        }
        Ok(group)
    }

    async fn delete_group(&self, id: u64) -> Result<(), Error> {
        let mut state = self.begin(Call::DeleteGroup(id))?;
        state.groups.remove(&id).ok_or(Error::NotFound)?;
        state.namespaces.retain(|n| n.id != id);
        Ok(())
    }

    async fn get_project(&self, id: u64) -> Lookup<Project> {
        let result = self.begin(Call::GetProject(id)).and_then(|state| {
            state.projects.get(&id).cloned().ok_or(Error::NotFound)
        });
        Lookup::from_result(result)
    }

    async fn create_project(&self, payload: &ProjectCreatePayload) -> Result<Project, Error> {
        let mut state = self.begin(Call::CreateProject(payload.clone()))?;
        let namespace = match payload.namespace_id {
            Some(namespace_id) => state.namespace(namespace_id)?,
            None => state.namespace(ROOT_NAMESPACE_ID)?,
        };
        let path = payload
            .path
            .clone()
            .unwrap_or_else(|| payload.name.to_lowercase().replace(' ', "-"));
        if state
            .projects
            .values()
            .any(|p| p.path == path && p.namespace.as_ref().map(|n| n.id) == Some(namespace.id))
        {
            return Err(path_taken("project"));
        }

        let id = state.allocate_id();
        let now = Utc::now();
        let mut project = Project {
            id,
            name: payload.name.clone(),
            path,
            default_branch: Some(
                payload
                    .default_branch
                    .clone()
                    .unwrap_or_else(|| "main".to_string()),
            ),
            namespace: None,
            description: Some(payload.description.clone().unwrap_or_default()),
            issues_enabled: Some(payload.issues_enabled.unwrap_or(true)),
            merge_requests_enabled: Some(payload.merge_requests_enabled.unwrap_or(true)),
            builds_enabled: Some(payload.builds_enabled.unwrap_or(true)),
            wiki_enabled: Some(payload.wiki_enabled.unwrap_or(true)),
            snippets_enabled: Some(payload.snippets_enabled.unwrap_or(true)),
            container_registry_enabled: Some(payload.container_registry_enabled.unwrap_or(false)),
            shared_runners_enabled: Some(payload.shared_runners_enabled.unwrap_or(true)),
            visibility_level: Some(payload.visibility_level.unwrap_or(VisibilityLevel::PRIVATE)),
            public_builds: Some(payload.public_builds.unwrap_or(true)),
            only_allow_merge_if_build_succeeds: Some(
                payload.only_allow_merge_if_build_succeeds.unwrap_or(false),
            ),
            only_allow_merge_if_all_discussions_are_resolved: Some(
                payload
                    .only_allow_merge_if_all_discussions_are_resolved
                    .unwrap_or(false),
            ),
            lfs_enabled: Some(payload.lfs_enabled.unwrap_or(true)),
            request_access_enabled: Some(payload.request_access_enabled.unwrap_or(false)),
            ssh_url_to_repo: None,
            http_url_to_repo: None,
            web_url: None,
            owner: None,
            name_with_namespace: None,
            path_with_namespace: None,
            open_issues_count: Some(0),
            approvals_before_merge: Some(0),
            created_at: Some(now),
            last_activity_at: Some(now),
            creator_id: Some(ROOT_NAMESPACE_ID),
            archived: Some(false),
            avatar_url: None,
            forks_count: Some(0),
            stars_count: Some(0),
            runners_token: Some(format!("runner-token-{id}")),
            forked_from_project: None,
        };
        place_project(&mut project, namespace);

        state.projects.insert(id, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: u64,
        payload: &ProjectUpdatePayload,
    ) -> Result<Project, Error> {
        let mut state = self.begin(Call::UpdateProject(id, payload.clone()))?;
        let project = state.projects.get_mut(&id).ok_or(Error::NotFound)?;

        if let Some(name) = &payload.name {
            project.name = name.clone();
        }
        if let Some(path) = &payload.path {
            project.path = path.clone();
        }
        if payload.default_branch.is_some() {
            project.default_branch = payload.default_branch.clone();
        }
        if payload.description.is_some() {
            project.description = payload.description.clone();
        }

        macro_rules! apply {
            ($project:ident, $payload:ident; $($field:ident),* $(,)?) => {
                $(if $payload.$field.is_some() {
                    $project.$field = $payload.$field;
                })*
            };
        }
        apply!(
            project,
            payload;
            issues_enabled,
            merge_requests_enabled,
            builds_enabled,
            wiki_enabled,
            snippets_enabled,
            container_registry_enabled,
            shared_runners_enabled,
            visibility_level,
            public_builds,
            only_allow_merge_if_build_succeeds,
            only_allow_merge_if_all_discussions_are_resolved,
            lfs_enabled,
            request_access_enabled,
        );

        if let Some(namespace) = project.namespace.clone() {
            place_project(project, namespace);
        }
        project.last_activity_at = Some(Utc::now());
        Ok(project.clone())
    }

    async fn transfer_project(
        &self,
        id: u64,
        payload: &ProjectTransferPayload,
    ) -> Result<Project, Error> {
        let mut state = self.begin(Call::TransferProject(id, payload.namespace))?;
        let namespace = state.namespace(payload.namespace)?;
        let project = state.projects.get_mut(&id).ok_or(Error::NotFound)?;
        place_project(project, namespace);
        Ok(project.clone())
    }

    async fn delete_project(&self, id: u64) -> Result<(), Error> {
        let mut state = self.begin(Call::DeleteProject(id))?;
        state.projects.remove(&id).ok_or(Error::NotFound)?;
        Ok(())
    }

    async fn list_namespaces(&self) -> Result<Vec<Namespace>, Error> {
        let state = self.begin(Call::ListNamespaces)?;
        Ok(state.namespaces.clone())
    }
}

impl FakeState {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn namespace(&self, id: u64) -> Result<Namespace, Error> {
        self.namespaces
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }
}

/// Sets the namespace of a project and rebuilds every field derived from it.
fn place_project(project: &mut Project, namespace: Namespace) {
    let namespace_path = namespace
        .full_path
        .clone()
        .unwrap_or_else(|| namespace.path.clone());
    let full_path = format!("{namespace_path}/{}", project.path);

    project.ssh_url_to_repo = Some(format!("git@{FAKE_HOST}:{full_path}.git"));
    project.http_url_to_repo = Some(format!("https://{FAKE_HOST}/{full_path}.git"));
    project.web_url = Some(format!("https://{FAKE_HOST}/{full_path}"));
    project.name_with_namespace = Some(format!("{} / {}", namespace.name, project.name));
    project.path_with_namespace = Some(full_path);
    project.owner = match namespace.kind {
        NamespaceKind::User => Some(ObjectRef { id: namespace.id }),
        _ => None,
    };
    project.namespace = Some(namespace);
}

fn group_web_url(path: &str) -> String {
    format!("https://{FAKE_HOST}/groups/{path}")
}

fn path_taken(kind: &str) -> Error {
    Error::Api {
        status: 400,
        message: format!("Failed to save {kind}: path has already been taken"),
    }
}
