//! Demo data applied at startup when seeding is enabled.
//!
//! Users are upserted by email. Articles and tickets are only inserted into
//! an empty knowledge base or ticket table, so restarts never duplicate them.

use chrono::Duration;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{ArticleRepository, TicketRepository, UserRepository};
use crate::domain::service_error_mapping::{
    map_article_repository_error, map_ticket_repository_error, map_user_repository_error,
};
use crate::domain::{
    ArticleDraft, ArticleId, DisplayName, EmailAddress, Error, NewUser, Role, Ticket, TicketId,
    TicketPriority, TicketStatus, UserId,
};

/// Demo administrator account.
pub const DEMO_ADMIN_EMAIL: &str = "admin@company.com";
/// Demo requester account.
pub const DEMO_USER_EMAIL: &str = "user@company.com";

/// What a seeding run changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSeedReport {
    pub admin_id: UserId,
    pub user_id: UserId,
    pub articles_inserted: usize,
    pub tickets_inserted: usize,
}

struct DemoArticle {
    title: &'static str,
    content: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    views: i64,
}

const DEMO_ARTICLES: [DemoArticle; 3] = [
    DemoArticle {
        title: "How to reset your password",
        content: "# How to reset your password\n\n\
## Steps\n\n\
1. Open the sign-in page\n\
2. Click \"Forgot password\"\n\
3. Enter your work email\n\
4. Follow the reset link sent to your inbox\n\
5. Choose a new password\n\n\
## Notes\n\
- Passwords must be at least 8 characters long\n\
- Mix upper and lower case letters, digits and symbols",
        category: "Authentication",
        tags: &["password", "reset", "login"],
        views: 156,
    },
    DemoArticle {
        title: "Setting up the office VPN",
        content: "# Setting up the VPN\n\n\
## Installation\n\n\
### Windows\n\
1. Download the VPN client from IT\n\
2. Install it\n\
3. Enter the server address and your credentials\n\
4. Test the connection\n\n\
### Mac\n\
1. Open System Settings\n\
2. Select Network\n\
3. Add a VPN configuration\n\
4. Enter the server details\n\n\
## Troubleshooting\n\
- Check your internet connection\n\
- Check your username and password\n\
- Contact IT if you still cannot connect",
        category: "Network",
        tags: &["vpn", "network", "connection"],
        views: 89,
    },
    DemoArticle {
        title: "Requesting access to a shared folder",
        content: "# Requesting shared folder access\n\n\
## Steps\n\n\
1. Identify the folder you need\n\
2. Choose the access level (read or write)\n\
3. Explain why you need access\n\
4. File the request as a ticket\n\
5. Wait for your manager's approval\n\n\
## Access levels\n\
- **Read Only**: view files\n\
- **Read/Write**: edit and create files\n\
- **Full Control**: manage the folder",
        category: "File Access",
        tags: &["file", "access", "permission", "folder"],
        views: 203,
    },
];

struct DemoTicket {
    title: &'static str,
    description: &'static str,
    status: TicketStatus,
    priority: TicketPriority,
}

const DEMO_TICKETS: [DemoTicket; 3] = [
    DemoTicket {
        title: "Cannot access email",
        description: "Since this morning I cannot reach my mailbox.\n\n\
- Outlook shows \"Cannot connect to server\"\n\
- Webmail fails as well\n\
- Same result on another machine",
        status: TicketStatus::Open,
        priority: TicketPriority::High,
    },
    DemoTicket {
        title: "Install Adobe Photoshop",
        description: "Please install Photoshop for project image editing.\n\n\
- Windows 11, 16 GB RAM\n\
- A company licence is already available",
        status: TicketStatus::InProgress,
        priority: TicketPriority::Medium,
    },
    DemoTicket {
        title: "Meeting room A printer not working",
        description: "The printer in meeting room A does not respond.\n\n\
- Red light blinking after power on\n\
- Print jobs are ignored\n\
- A paper jam was cleared yesterday",
        status: TicketStatus::Resolved,
        priority: TicketPriority::Urgent,
    },
];

fn demo_user(email: &str, name: &str, role: Role) -> Result<NewUser, Error> {
    Ok(NewUser {
        email: EmailAddress::new(email)
            .map_err(|err| Error::internal(format!("invalid demo email: {err}")))?,
        name: DisplayName::new(name)
            .map_err(|err| Error::internal(format!("invalid demo name: {err}")))?,
        role,
    })
}

/// Seed demo users, articles and tickets.
pub async fn seed_demo_data<U, T, A>(
    users: &U,
    tickets: &T,
    articles: &A,
    clock: &dyn Clock,
) -> Result<DemoSeedReport, Error>
where
    U: UserRepository + ?Sized,
    T: TicketRepository + ?Sized,
    A: ArticleRepository + ?Sized,
{
    let admin = users
        .upsert_by_email(&demo_user(DEMO_ADMIN_EMAIL, "System Administrator", Role::Admin)?)
        .await
        .map_err(map_user_repository_error)?;
    let requester = users
        .upsert_by_email(&demo_user(DEMO_USER_EMAIL, "Regular Employee", Role::User)?)
        .await
        .map_err(map_user_repository_error)?;

    let now = clock.utc();
    let mut articles_inserted = 0;
    let existing_articles = articles
        .count_all()
        .await
        .map_err(map_article_repository_error)?;
    if existing_articles == 0 {
        for (offset, demo) in (0_i64..).zip(DEMO_ARTICLES.iter()) {
            let draft = ArticleDraft {
                title: demo.title.to_owned(),
                content: demo.content.to_owned(),
                category: demo.category.to_owned(),
                tags: demo.tags.iter().map(|tag| (*tag).to_owned()).collect(),
                published: true,
                views: demo.views,
                author_id: admin.id,
            };
            articles
                .insert(&ArticleId::random(), &draft, now + Duration::seconds(offset))
                .await
                .map_err(map_article_repository_error)?;
            articles_inserted += 1;
        }
    }

    let mut tickets_inserted = 0;
    let existing_tickets = tickets
        .status_counts()
        .await
        .map_err(map_ticket_repository_error)?
        .total();
    if existing_tickets == 0 {
        for (offset, demo) in (0_i64..).zip(DEMO_TICKETS.iter()) {
            let created_at = now + Duration::seconds(offset);
            let ticket = Ticket {
                id: TicketId::random(),
                title: demo.title.to_owned(),
                description: demo.description.to_owned(),
                status: demo.status,
                priority: demo.priority,
                created_at,
                updated_at: created_at,
                user_id: requester.id,
            };
            tickets
                .insert(&ticket)
                .await
                .map_err(map_ticket_repository_error)?;
            tickets_inserted += 1;
        }
    }

    info!(articles_inserted, tickets_inserted, "demo data seeded");
    Ok(DemoSeedReport {
        admin_id: admin.id,
        user_id: requester.id,
        articles_inserted,
        tickets_inserted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockArticleRepository, MockTicketRepository, MockUserRepository};
    use crate::domain::{TicketStatusCounts, User};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn echo_users() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_upsert_by_email().times(2).returning(|new_user| {
            Ok(User {
                id: UserId::random(),
                email: new_user.email.clone(),
                name: new_user.name.clone(),
                role: new_user.role,
            })
        });
        users
    }

    #[rstest]
    #[tokio::test]
    async fn empty_store_receives_articles_and_tickets() {
        let mut tickets = MockTicketRepository::new();
        tickets
            .expect_status_counts()
            .return_once(|| Ok(TicketStatusCounts::default()));
        tickets.expect_insert().times(3).returning(|_| Ok(()));
        let mut articles = MockArticleRepository::new();
        articles.expect_count_all().return_once(|| Ok(0));
        articles
            .expect_insert()
            .withf(|_, draft, _| draft.published)
            .times(3)
            .returning(|_, _, _| Ok(()));

        let report = seed_demo_data(&echo_users(), &tickets, &articles, &DefaultClock)
            .await
            .expect("seeded");
        assert_eq!(report.articles_inserted, 3);
        assert_eq!(report.tickets_inserted, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn populated_store_only_upserts_users() {
        let mut tickets = MockTicketRepository::new();
        tickets.expect_status_counts().return_once(|| {
            let mut counts = TicketStatusCounts::default();
            counts.record(TicketStatus::Open, 1);
            Ok(counts)
        });
        let mut articles = MockArticleRepository::new();
        articles.expect_count_all().return_once(|| Ok(4));

        let report = seed_demo_data(&echo_users(), &tickets, &articles, &DefaultClock)
            .await
            .expect("seeded");
        assert_eq!(report.articles_inserted, 0);
        assert_eq!(report.tickets_inserted, 0);
    }
}
