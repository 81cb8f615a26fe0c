//! Notification visibility and audience resolution.
//!
//! Decides who can see a notification and who receives its email fan-out,
//! independent of storage. Visibility never consults read receipts.

use crate::model::{Audience, Notification, Role, Viewer};
use crate::traits::{Mailer, UserDirectory};

/// Decision table for whether `viewer` may see `notification`.
///
/// All → always; Semester → the viewer has a semester and it equals the
/// notification's target semester; User → the viewer is the targeted user.
pub fn visible_to(notification: &Notification, viewer: &Viewer) -> bool {
    match notification.audience {
        Audience::All => true,
        Audience::Semester => match (&viewer.semester, &notification.audience_semester) {
            (Some(mine), Some(target)) => mine == target,
            _ => false,
        },
        Audience::User => notification.audience_user_id == Some(viewer.id),
    }
}

/// Filter a creation-time-descending listing down to what `viewer` may see,
/// optionally truncated for dashboard contexts.
pub fn visible_notifications(
    notifications: &[Notification],
    viewer: &Viewer,
    limit: Option<usize>,
) -> Vec<Notification> {
    let iter = notifications.iter().filter(|n| visible_to(n, viewer)).cloned();
    match limit {
        Some(n) => iter.take(n).collect(),
        None => iter.collect(),
    }
}

/// Resolve the email recipients of a notification against the user
/// directory. Only students receive audience-wide broadcasts; a user-targeted
/// notification resolves to that user alone, if it exists.
pub async fn resolve_recipients(
    notification: &Notification,
    directory: &dyn UserDirectory,
) -> Vec<String> {
    match notification.audience {
        Audience::All => directory
            .students()
            .await
            .into_iter()
            .map(|u| u.email)
            .collect(),
        Audience::Semester => match &notification.audience_semester {
            Some(semester) => directory
                .students_in_semester(semester)
                .await
                .into_iter()
                .map(|u| u.email)
                .collect(),
            None => Vec::new(),
        },
        Audience::User => match notification.audience_user_id {
            Some(id) => directory
                .user(id)
                .await
                .into_iter()
                .map(|u| u.email)
                .collect(),
            None => Vec::new(),
        },
    }
}

/// Best-effort email fan-out for a freshly persisted notification.
///
/// Each recipient is attempted independently; a failed send is logged and
/// counted against no one. Returns how many sends succeeded. Nothing here
/// rolls back the notification; delivery is fire-and-forget.
pub async fn broadcast(
    notification: &Notification,
    directory: &dyn UserDirectory,
    mailer: &dyn Mailer,
) -> usize {
    let recipients = resolve_recipients(notification, directory).await;
    let subject = format!("[studyhub] {}", notification.title);

    let mut sent = 0usize;
    for recipient in &recipients {
        if mailer.send(recipient, &subject, &notification.body).await {
            sent += 1;
        } else {
            tracing::warn!(%recipient, notification_id = notification.id, "mail send failed");
        }
    }
    tracing::info!(
        notification_id = notification.id,
        audience = %notification.audience,
        sent,
        total = recipients.len(),
        "notification fan-out complete"
    );
    sent
}

/// Convenience: the viewer projection for filtering as a given student.
pub fn student_viewer(id: u64, semester: Option<&str>) -> Viewer {
    Viewer {
        id,
        role: Role::Student,
        semester: semester.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn notification(audience: Audience, semester: Option<&str>, user_id: Option<u64>) -> Notification {
        Notification {
            id: 1,
            title: "Exam schedule".into(),
            body: "See attached".into(),
            link: None,
            audience,
            audience_semester: semester.map(str::to_string),
            audience_user_id: user_id,
            created_at: Utc::now(),
        }
    }

    fn student(id: u64, email: &str, semester: Option<&str>) -> User {
        User {
            id,
            name: format!("user {id}"),
            email: email.into(),
            password_hash: "x".into(),
            role: Role::Student,
            semester: semester.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    struct FixedDirectory {
        users: Vec<User>,
    }

    #[async_trait]
    impl UserDirectory for FixedDirectory {
        async fn user(&self, id: u64) -> Option<User> {
            self.users.iter().find(|u| u.id == id).cloned()
        }
        async fn user_by_email(&self, email: &str) -> Option<User> {
            self.users.iter().find(|u| u.email == email).cloned()
        }
        async fn students(&self) -> Vec<User> {
            self.users
                .iter()
                .filter(|u| u.role == Role::Student)
                .cloned()
                .collect()
        }
        async fn students_in_semester(&self, semester: &str) -> Vec<User> {
            self.users
                .iter()
                .filter(|u| u.role == Role::Student && u.semester.as_deref() == Some(semester))
                .cloned()
                .collect()
        }
    }

    /// Mailer that fails for any recipient containing "bounce".
    struct BouncyMailer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Mailer for BouncyMailer {
        async fn send(&self, to: &str, _subject: &str, _body: &str) -> bool {
            self.calls.fetch_add(1, Ordering::Relaxed);
            !to.contains("bounce")
        }
    }

    #[test]
    fn audience_all_visible_to_everyone() {
        let n = notification(Audience::All, None, None);
        assert!(visible_to(&n, &student_viewer(1, Some("3"))));
        assert!(visible_to(&n, &student_viewer(2, None)));
    }

    #[test]
    fn audience_semester_requires_matching_semester() {
        let n = notification(Audience::Semester, Some("3"), None);
        assert!(visible_to(&n, &student_viewer(1, Some("3"))));
        assert!(!visible_to(&n, &student_viewer(1, Some("4"))));
        assert!(!visible_to(&n, &student_viewer(1, None)));
    }

    #[test]
    fn audience_user_requires_matching_id() {
        let n = notification(Audience::User, None, Some(7));
        assert!(visible_to(&n, &student_viewer(7, None)));
        assert!(!visible_to(&n, &student_viewer(8, Some("3"))));
    }

    #[test]
    fn listing_filters_and_truncates() {
        let notifications = vec![
            notification(Audience::All, None, None),
            notification(Audience::Semester, Some("4"), None),
            notification(Audience::All, None, None),
            notification(Audience::User, None, Some(1)),
        ];
        let viewer = student_viewer(1, Some("3"));
        let all = visible_notifications(&notifications, &viewer, None);
        assert_eq!(all.len(), 3);
        let bounded = visible_notifications(&notifications, &viewer, Some(2));
        assert_eq!(bounded.len(), 2);
    }

    #[tokio::test]
    async fn recipients_for_all_are_every_student() {
        let directory = FixedDirectory {
            users: vec![
                student(1, "a@x.edu", Some("3")),
                student(2, "b@x.edu", Some("4")),
                User {
                    role: Role::Admin,
                    ..student(3, "admin@x.edu", None)
                },
            ],
        };
        let n = notification(Audience::All, None, None);
        let recipients = resolve_recipients(&n, &directory).await;
        assert_eq!(recipients, vec!["a@x.edu", "b@x.edu"]);
    }

    #[tokio::test]
    async fn recipients_for_semester_filter_by_label() {
        let directory = FixedDirectory {
            users: vec![
                student(1, "a@x.edu", Some("3")),
                student(2, "b@x.edu", Some("4")),
            ],
        };
        let n = notification(Audience::Semester, Some("4"), None);
        let recipients = resolve_recipients(&n, &directory).await;
        assert_eq!(recipients, vec!["b@x.edu"]);
    }

    #[tokio::test]
    async fn recipients_for_missing_user_are_empty() {
        let directory = FixedDirectory { users: vec![] };
        let n = notification(Audience::User, None, Some(42));
        assert!(resolve_recipients(&n, &directory).await.is_empty());
    }

    #[tokio::test]
    async fn broadcast_counts_successes_and_survives_failures() {
        let directory = FixedDirectory {
            users: vec![
                student(1, "ok@x.edu", Some("3")),
                student(2, "bounce@x.edu", Some("3")),
                student(3, "fine@x.edu", Some("3")),
            ],
        };
        let mailer = BouncyMailer {
            calls: AtomicUsize::new(0),
        };
        let n = notification(Audience::All, None, None);
        let sent = broadcast(&n, &directory, &mailer).await;
        assert_eq!(sent, 2);
        assert_eq!(mailer.calls.load(Ordering::Relaxed), 3);
    }
}
