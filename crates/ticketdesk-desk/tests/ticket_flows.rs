// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end ticket flows through the desk with in-memory collaborators.

use std::time::Duration;

use ticketdesk_core::{
    Actor, Category, ChannelId, OutboundMessage, Reply, RoleId, TicketPhase, UserId,
};
use ticketdesk_desk::cards;
use ticketdesk_desk::{AdminCommand, InteractionEvent};
use ticketdesk_test_utils::{MockPlatform, TestHarness};
use tracing_test::traced_test;

const STAFF_ROLE: &str = "900";
const LOGS: &str = "logs";

fn admin() -> Actor {
    Actor::new("admin").admin()
}

fn staff() -> Actor {
    Actor::new("staff").with_roles([RoleId::from(STAFF_ROLE)])
}

fn creator() -> Actor {
    Actor::new("creator")
}

async fn run_admin(harness: &TestHarness, command: AdminCommand) -> Reply {
    harness
        .send_one(InteractionEvent::Admin {
            actor: admin(),
            channel: ChannelId::from("admin-room"),
            command,
        })
        .await
}

/// Logs channel configured and completion restricted to the staff role.
async fn configured_harness() -> TestHarness {
    let harness = TestHarness::new();
    run_admin(
        &harness,
        AdminCommand::SetupLogs {
            channel: ChannelId::from(LOGS),
        },
    )
    .await;
    run_admin(
        &harness,
        AdminCommand::AddCompletionRole {
            role: RoleId::from(STAFF_ROLE),
        },
    )
    .await;
    harness
}

fn transcript_of(message: &OutboundMessage) -> Option<(String, String)> {
    let file = message.file.as_ref()?;
    Some((
        file.filename.clone(),
        String::from_utf8(file.data.clone()).ok()?,
    ))
}

#[tokio::test(start_paused = true)]
async fn completion_awards_category_points_to_each_helper() {
    let harness = configured_harness().await;
    run_admin(
        &harness,
        AdminCommand::SetPoints {
            category: Category::UltraDailies,
            points: 3,
        },
    )
    .await;

    let channel = harness.open_ticket(&creator(), Category::UltraDailies).await;

    let picker = harness
        .send_one(InteractionEvent::RequestCompletion {
            actor: staff(),
            channel: channel.clone(),
        })
        .await;
    assert!(matches!(picker, Reply::HelperPicker { replace: false, .. }));

    let prompt = harness
        .send_one(InteractionEvent::SelectHelpers {
            actor: staff(),
            channel: channel.clone(),
            helpers: vec![UserId::from("A"), UserId::from("B")],
        })
        .await;
    assert!(matches!(prompt, Reply::ConfirmHelpers { .. }));
    assert_eq!(
        harness
            .document()
            .await
            .active_tickets
            .require(&channel)
            .unwrap()
            .phase(),
        TicketPhase::CompletionPending
    );

    let closing = harness
        .send_one(InteractionEvent::ConfirmCompletion {
            actor: staff(),
            channel: channel.clone(),
        })
        .await;
    let Reply::Card { card, ephemeral } = closing else {
        panic!("expected closing card, got {closing:?}");
    };
    assert!(!ephemeral);
    assert_eq!(card.title, "✅ Ticket Completed");
    assert!(card.description.unwrap().contains("3 points each"));

    let document = harness.document().await;
    assert_eq!(document.helper_points.balance(&UserId::from("A")), 3);
    assert_eq!(document.helper_points.balance(&UserId::from("B")), 3);
    assert!(document.active_tickets.get(&channel).is_none());

    let logs = harness.platform.posted_to(&ChannelId::from(LOGS)).await;
    let completed = logs
        .iter()
        .flat_map(|m| &m.cards)
        .find(|c| c.title == "✅ Ticket Completed")
        .expect("completion log entry");
    assert!(
        completed
            .fields
            .iter()
            .any(|f| f.value == "3 points per helper (6 total)")
    );
    let (filename, _) = logs
        .iter()
        .find_map(transcript_of)
        .expect("transcript delivered");
    assert_eq!(filename, "ticket-1-transcript.txt");

    assert!(harness.desk.teardown().drain(Duration::from_secs(30)).await);
    assert_eq!(harness.platform.deleted_channels().await, vec![channel]);
}

#[tokio::test(start_paused = true)]
async fn transcript_pages_through_long_history_in_order() {
    let harness = configured_harness().await;
    let channel = harness.open_ticket(&creator(), Category::Others).await;

    let history = (1..=250)
        .map(|n| MockPlatform::history_message(n, "creator", &format!("msg-{n:03}")))
        .collect();
    harness.platform.seed_history(&channel, history).await;

    harness
        .send(InteractionEvent::CancelTicket {
            actor: creator(),
            channel: channel.clone(),
        })
        .await;

    assert_eq!(harness.platform.history_fetches(), 3);

    let logs = harness.platform.posted_to(&ChannelId::from(LOGS)).await;
    let delivery = logs
        .iter()
        .find(|m| m.file.is_some())
        .expect("transcript delivered");
    assert_eq!(
        delivery.content.as_deref(),
        Some("Transcript for canceled ticket #1:")
    );
    let (_, text) = transcript_of(delivery).unwrap();
    assert!(text.starts_with("Ticket Transcript - ticket-1\n"));
    let seen: Vec<&str> = text
        .match_indices("msg-")
        .map(|(at, _)| &text[at..at + "msg-000".len()])
        .collect();
    let posted: Vec<String> = (1..=250).map(|n| format!("msg-{n:03}")).collect();
    assert_eq!(seen, posted);
}

#[tokio::test(start_paused = true)]
async fn empty_channel_transcript_is_banner_only() {
    let harness = configured_harness().await;
    let channel = harness.open_ticket(&creator(), Category::Others).await;

    harness
        .send(InteractionEvent::CancelTicket {
            actor: creator(),
            channel: channel.clone(),
        })
        .await;

    assert_eq!(harness.platform.history_fetches(), 1);
    let logs = harness.platform.posted_to(&ChannelId::from(LOGS)).await;
    let (_, text) = logs.iter().find_map(transcript_of).unwrap();
    assert!(text.ends_with(&format!("{}\n\n", "=".repeat(80))));
    assert!(text.contains(&format!("Channel ID: {channel}")));
}

#[tokio::test(start_paused = true)]
async fn transcript_failure_still_closes_ticket() {
    let harness = configured_harness().await;
    let channel = harness.open_ticket(&creator(), Category::Others).await;
    harness.platform.fail_history(true);

    let replies = harness
        .send(InteractionEvent::CancelTicket {
            actor: staff(),
            channel: channel.clone(),
        })
        .await;
    assert!(matches!(replies.as_slice(), [Reply::Card { .. }]));

    let logs = harness.platform.posted_to(&ChannelId::from(LOGS)).await;
    assert!(logs.iter().all(|m| m.file.is_none()));
    assert!(harness.desk.teardown().drain(Duration::from_secs(30)).await);
    assert_eq!(harness.platform.deleted_channels().await, vec![channel]);
}

#[tokio::test]
async fn stranger_cannot_cancel() {
    let harness = configured_harness().await;
    let channel = harness.open_ticket(&creator(), Category::Spamming).await;

    let reply = harness
        .send_one(InteractionEvent::CancelTicket {
            actor: Actor::new("stranger"),
            channel: channel.clone(),
        })
        .await;
    assert_eq!(reply, Reply::ephemeral(format!("❌ {}", cards::DENY_CANCEL)));
    assert!(
        harness
            .document()
            .await
            .active_tickets
            .get(&channel)
            .is_some()
    );
}

#[tokio::test]
async fn ticket_numbers_never_reused_after_failed_provisioning() {
    let harness = TestHarness::new();
    harness.platform.fail_provisioning(true);

    let replies = harness
        .send(InteractionEvent::SubmitIntake {
            actor: creator(),
            category: Category::Others,
            values: vec!["room".into(), "server".into(), "name".into()],
        })
        .await;
    assert_eq!(replies, vec![Reply::ephemeral(cards::GENERIC_FAILURE)]);
    assert_eq!(harness.document().await.ticket_counter, 1);
    assert!(harness.document().await.active_tickets.is_empty());

    harness.platform.fail_provisioning(false);
    harness.open_ticket(&creator(), Category::Others).await;

    let provisioned = harness.platform.provisioned().await;
    assert_eq!(provisioned.len(), 1);
    assert_eq!(provisioned[0].1.name, "ticket-2");
    assert_eq!(harness.document().await.ticket_counter, 2);
}

#[tokio::test]
async fn intake_creates_channel_card_and_log() {
    let harness = configured_harness().await;
    harness.platform.add_role("Helpers", "777").await;
    run_admin(
        &harness,
        AdminCommand::AddCreationRole {
            role: RoleId::from("777"),
        },
    )
    .await;
    let member = Actor::new("member").with_roles([RoleId::from("777")]);

    let reply = harness
        .send_one(InteractionEvent::SubmitIntake {
            actor: member.clone(),
            category: Category::TempleShrine,
            values: vec![
                "shrine-1".into(),
                "Safiria".into(),
                "Aenaen".into(),
                "   ".into(),
            ],
        })
        .await;
    let channel = ChannelId::from("5000");
    assert_eq!(reply, Reply::ephemeral("✅ Ticket created! Check <#5000>"));

    let (_, request) = harness.platform.provisioned().await.remove(0);
    assert_eq!(request.creator, member.id);
    assert_eq!(
        request.allowed_roles,
        vec![RoleId::from(STAFF_ROLE), RoleId::from("777")]
    );

    let posts = harness.platform.posted_to(&channel).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content.as_deref(), Some("<@&777> - New help request!"));
    let card = &posts[0].cards[0];
    assert_eq!(card.title, "🎫 Help Ticket #1");
    assert!(
        card.fields
            .iter()
            .any(|f| f.name == "Description" && f.value == "N/A")
    );

    let logs = harness.platform.posted_to(&ChannelId::from(LOGS)).await;
    assert!(logs.iter().flat_map(|m| &m.cards).any(|c| c.title == "📝 Ticket Created"));

    let ticket = harness
        .document()
        .await
        .active_tickets
        .get(&channel)
        .cloned()
        .unwrap();
    assert_eq!(ticket.category, Category::TempleShrine);
    assert_eq!(ticket.phase(), TicketPhase::Open);
}

#[tokio::test]
async fn creation_gate_blocks_members_without_role() {
    let harness = TestHarness::new();
    run_admin(
        &harness,
        AdminCommand::AddCreationRole {
            role: RoleId::from("777"),
        },
    )
    .await;

    let denied = harness
        .send_one(InteractionEvent::OpenPanel { actor: creator() })
        .await;
    assert_eq!(denied, Reply::ephemeral(format!("❌ {}", cards::DENY_CREATE)));

    let allowed = harness
        .send_one(InteractionEvent::OpenPanel {
            actor: Actor::new("member").with_roles([RoleId::from("777")]),
        })
        .await;
    assert!(matches!(allowed, Reply::CategoryMenu { .. }));
}

#[tokio::test]
async fn stale_category_menu_refused_after_access_lost() {
    let harness = TestHarness::new();
    let menu = harness
        .send_one(InteractionEvent::OpenPanel { actor: creator() })
        .await;
    assert!(matches!(menu, Reply::CategoryMenu { .. }));

    run_admin(
        &harness,
        AdminCommand::AddCreationRole {
            role: RoleId::from("777"),
        },
    )
    .await;

    let denied = harness
        .send_one(InteractionEvent::ChooseCategory {
            actor: creator(),
            category: Category::Others,
        })
        .await;
    assert_eq!(denied, Reply::ephemeral(format!("❌ {}", cards::DENY_CREATE)));

    let form = harness
        .send_one(InteractionEvent::ChooseCategory {
            actor: Actor::new("member").with_roles([RoleId::from("777")]),
            category: Category::Others,
        })
        .await;
    assert_eq!(
        form,
        Reply::IntakeForm {
            category: Category::Others
        }
    );
}

#[tokio::test]
async fn creator_flag_does_not_close() {
    let harness = configured_harness().await;
    let channel = harness.open_ticket(&creator(), Category::Others).await;

    let reply = harness
        .send_one(InteractionEvent::RequestCompletion {
            actor: creator(),
            channel: channel.clone(),
        })
        .await;
    assert_eq!(reply, Reply::ephemeral(cards::CREATOR_FLAGGED_PRIVATE));

    let posts = harness.platform.posted_to(&channel).await;
    assert_eq!(
        posts.last().and_then(|m| m.content.as_deref()),
        Some(cards::CREATOR_FLAGGED_PUBLIC)
    );
    let ticket = harness
        .document()
        .await
        .active_tickets
        .get(&channel)
        .cloned()
        .unwrap();
    assert_eq!(ticket.phase(), TicketPhase::Open);
    assert_eq!(ticket.flagged_by, Some(creator().id));
}

#[tokio::test]
async fn withdraw_then_confirm_different_helpers() {
    let harness = configured_harness().await;
    let channel = harness.open_ticket(&creator(), Category::Others).await;

    harness
        .send(InteractionEvent::SelectHelpers {
            actor: staff(),
            channel: channel.clone(),
            helpers: vec![UserId::from("A")],
        })
        .await;
    let reprompt = harness
        .send_one(InteractionEvent::WithdrawCompletion {
            actor: staff(),
            channel: channel.clone(),
        })
        .await;
    assert!(matches!(reprompt, Reply::HelperPicker { replace: true, .. }));

    harness
        .send(InteractionEvent::SelectHelpers {
            actor: staff(),
            channel: channel.clone(),
            helpers: vec![UserId::from("B")],
        })
        .await;
    harness
        .send(InteractionEvent::ConfirmCompletion {
            actor: staff(),
            channel,
        })
        .await;

    let document = harness.document().await;
    assert_eq!(document.helper_points.balance(&UserId::from("A")), 0);
    assert_eq!(document.helper_points.balance(&UserId::from("B")), 1);
}

#[tokio::test]
async fn confirm_without_nomination_is_rejected() {
    let harness = configured_harness().await;
    let channel = harness.open_ticket(&creator(), Category::Others).await;

    let reply = harness
        .send_one(InteractionEvent::ConfirmCompletion {
            actor: staff(),
            channel: channel.clone(),
        })
        .await;
    assert_eq!(
        reply,
        Reply::ephemeral(format!("❌ {}", cards::NO_HELPERS_SELECTED))
    );
    assert!(harness.document().await.helper_points.is_empty());
}

#[tokio::test]
async fn actions_on_unknown_channel_report_missing_ticket() {
    let harness = TestHarness::new();
    let reply = harness
        .send_one(InteractionEvent::CancelTicket {
            actor: admin(),
            channel: ChannelId::from("nowhere"),
        })
        .await;
    assert_eq!(reply, Reply::ephemeral("❌ Ticket data not found!"));
}

#[tokio::test(start_paused = true)]
#[traced_test]
async fn failed_teardown_is_logged_and_ledger_kept() {
    let harness = configured_harness().await;
    let channel = harness.open_ticket(&creator(), Category::Others).await;
    harness.platform.fail_deletes(true);

    harness
        .send(InteractionEvent::SelectHelpers {
            actor: staff(),
            channel: channel.clone(),
            helpers: vec![UserId::from("A")],
        })
        .await;
    harness
        .send(InteractionEvent::ConfirmCompletion {
            actor: staff(),
            channel,
        })
        .await;

    assert!(harness.desk.teardown().drain(Duration::from_secs(30)).await);
    assert!(logs_contain("failed to delete ticket channel"));
    assert!(harness.platform.deleted_channels().await.is_empty());
    assert_eq!(
        harness
            .document()
            .await
            .helper_points
            .balance(&UserId::from("A")),
        1
    );
}

#[tokio::test]
async fn leaderboard_ranks_and_resets() {
    let harness = configured_harness().await;
    let rounds = [
        ("A", Category::Others),
        ("B", Category::Others),
        ("A", Category::Spamming),
    ];
    for (helper, category) in rounds {
        let channel = harness.open_ticket(&creator(), category).await;
        harness
            .send(InteractionEvent::SelectHelpers {
                actor: staff(),
                channel: channel.clone(),
                helpers: vec![UserId::from(helper)],
            })
            .await;
        harness
            .send(InteractionEvent::ConfirmCompletion {
                actor: staff(),
                channel,
            })
            .await;
    }

    let board = harness
        .send_one(InteractionEvent::Admin {
            actor: creator(),
            channel: ChannelId::from("general"),
            command: AdminCommand::Leaderboard,
        })
        .await;
    let Reply::Card { card, .. } = board else {
        panic!("expected leaderboard card");
    };
    assert_eq!(
        card.description.as_deref(),
        Some("🥇 <@A> - 2 points\n🥈 <@B> - 1 point")
    );

    let reset = run_admin(&harness, AdminCommand::ResetLeaderboard).await;
    assert_eq!(reset, Reply::ephemeral("✅ Leaderboard has been reset!"));
    assert!(harness.document().await.helper_points.is_empty());
}

#[tokio::test]
async fn duplicate_role_is_reported_not_stored_twice() {
    let harness = configured_harness().await;
    let reply = run_admin(
        &harness,
        AdminCommand::AddCompletionRole {
            role: RoleId::from(STAFF_ROLE),
        },
    )
    .await;
    assert_eq!(
        reply,
        Reply::ephemeral("❌ Role <@&900> is already in the list of allowed completion roles!")
    );
    assert_eq!(
        harness.document().await.allowed_completion_roles,
        vec![RoleId::from(STAFF_ROLE)]
    );
}

#[tokio::test]
async fn setup_ticket_places_new_channels() {
    let harness = TestHarness::new();
    let reply = run_admin(
        &harness,
        AdminCommand::SetupTicket {
            category: Category::UltraSpeaker,
            target: ChannelId::from("4242"),
        },
    )
    .await;
    assert_eq!(
        reply,
        Reply::ephemeral("✅ Tickets for **Ultra Speaker** will now be created in <#4242>!")
    );

    harness.open_ticket(&creator(), Category::UltraSpeaker).await;
    harness.open_ticket(&creator(), Category::Others).await;
    let provisioned = harness.platform.provisioned().await;
    assert_eq!(provisioned[0].1.placement, Some(ChannelId::from("4242")));
    assert_eq!(provisioned[1].1.placement, None);
}

#[tokio::test]
async fn setup_panel_posts_in_invoking_channel() {
    let harness = TestHarness::new();
    let reply = harness
        .send_one(InteractionEvent::Admin {
            actor: admin(),
            channel: ChannelId::from("lobby"),
            command: AdminCommand::SetupPanel,
        })
        .await;
    assert_eq!(reply, Reply::ephemeral("✅ Help panel successfully created!"));
    let posts = harness.platform.posted_to(&ChannelId::from("lobby")).await;
    assert_eq!(posts[0].cards[0].title, "🎫 AQW Guild Help Desk");
}
