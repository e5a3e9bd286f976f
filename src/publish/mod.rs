//! Git publishing session.
//!
//! Drives one local working copy of the site repository through the
//! publishing workflow:
//!
//! ```text
//! CredentialValidator ──► RepositorySession::acquire ──► BranchController
//!                              │ (no copy yet)                 │
//!                              ▼                               ▼
//!                         ForkResolver            [content files written]
//!                                                              │
//!                          PushSynchronizer ◄── StagingCommitter
//! ```
//!
//! Every step returns a typed result and appends to a [`Transcript`]; none
//! of them prints.

mod branch;
mod commit;
mod credential;
mod error;
mod fork;
mod push;
mod report;
mod session;

#[cfg(test)]
pub(crate) mod fixture;

pub use branch::{BranchController, BranchName, BranchOutcome};
pub use commit::{AuthorIdentity, CommitResult, ContentChange, StagingCommitter};
pub use credential::{Credential, CredentialValidator, describe_permission};
pub use error::{AuthError, BranchError, CommitError, ForkError, PushError, SessionError};
pub use fork::{Fork, ForkResolver};
pub use push::{PushResult, PushSynchronizer};
pub use report::{Report, Transcript};
pub use session::{RepositorySession, SessionOptions};

#[cfg(test)]
mod tests {
    use super::{fixture::Fixture, *};
    use crate::utils::date::DateTimeUtc;
    use std::fs;

    #[test]
    fn test_first_article_end_to_end() {
        let fx = Fixture::new();
        let log = Transcript::new();

        let cred = CredentialValidator::new(&fx.host)
            .validate(Some("T1"), Some("alice@example.test"), &log)
            .unwrap();

        let handle = fx
            .session
            .acquire_on(&fx.host, &cred, DateTimeUtc::from_ymd(2024, 3, 1), &log)
            .unwrap();
        assert_eq!(
            handle.remote_full_name.as_deref(),
            Some("alice/site_alice_2024-03-01")
        );

        let branch = BranchName::for_article("My First Post").unwrap();
        let outcome = BranchController::new(&fx.session)
            .start_branch("main", &branch, &log)
            .unwrap();
        assert_eq!(
            outcome,
            BranchOutcome::Created {
                name: "article/my_first_post".into()
            }
        );

        let article = "content/blog/2024/03/my-first-post/index.md";
        let path = fx.session.local_path().join(article);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "---\ntitle: My First Post\n---\n").unwrap();

        let author = AuthorIdentity::new(&cred.username, &cred.email);
        let change = ContentChange::new("My First Post first commit").with_path(article);
        let commit = StagingCommitter::new(&fx.session, author)
            .commit(&change, &log)
            .unwrap();
        assert!(matches!(commit, CommitResult::Created { .. }));

        let pushed = PushSynchronizer::new(&fx.session, &fx.host)
            .push(&cred, &log)
            .unwrap();
        assert_eq!(
            pushed,
            PushResult::Pushed {
                branch: "article/my_first_post".into()
            }
        );
        assert!(fx.fork_has_branch("alice/site_alice_2024-03-01", "article/my_first_post"));

        let report = Report::from_result(&Ok::<_, PushError>(pushed));
        assert!(report.ok);
        assert_eq!(report.status, "pushed article/my_first_post to origin");
        assert!(log.contains("[clone] cloned alice/site_alice_2024-03-01"));
    }

    #[test]
    fn test_failed_push_does_not_commit() {
        let fx = Fixture::new();
        let log = Transcript::new();
        let cred = fx.credential();
        fx.session
            .acquire_on(&fx.host, &cred, DateTimeUtc::from_ymd(2024, 3, 1), &log)
            .unwrap();
        BranchController::new(&fx.session)
            .start_branch("main", &BranchName::new("article/x").unwrap(), &log)
            .unwrap();

        let head = |fx: &Fixture| {
            fx.session
                .with_working_copy(|c| Ok::<_, SessionError>(c.git().run(["rev-parse", "HEAD"])?))
                .unwrap()
        };
        let before = head(&fx);

        fx.host
            .set_permission("alice/site_alice_2024-03-01", crate::host::PermissionLevel::None);
        let err = PushSynchronizer::new(&fx.session, &fx.host)
            .push(&cred, &log)
            .unwrap_err();
        assert!(!Report::from_result(&Err::<PushResult, _>(err)).ok);
        assert_eq!(head(&fx), before);
    }
}
