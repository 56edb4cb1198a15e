//! End-to-end exports: TSV logs in, transcript out.

use std::io::Cursor;

use integration_tests::fixtures::{channel_log, instant, snowflake_at, MapAssets, GUILD_LOG};
use scribe_core::Snowflake;
use scribe_ingest::{ChannelAssembler, GuildDirectory};
use scribe_render::{HtmlRenderer, TextRenderer};

const CHANNEL_ID: Snowflake = Snowflake::new(5);

fn reconstruct() -> (GuildDirectory, Vec<scribe_core::Message>) {
    let guild = GuildDirectory::from_reader(Cursor::new(GUILD_LOG)).unwrap();
    let messages = ChannelAssembler::from_reader(Cursor::new(channel_log())).unwrap();
    (guild, messages)
}

#[test]
fn text_transcript() {
    let (guild, messages) = reconstruct();
    let assets = MapAssets::with(&[("200", "attachments/5/200/cat.png")]);

    let mut out = Vec::new();
    TextRenderer::default()
        .render(&guild, CHANNEL_ID, &messages, &assets, &mut out)
        .unwrap();
    let out = String::from_utf8(out).unwrap();

    let expected = "\
[2020-01-10 00:00:00] Ali: hello **world** @bob \n\
[2020-01-10 00:01:00] Ali: check <#77> out \n\
[2020-01-10 00:02:00] bob: https://cdn.discordapp.com/attachments/5/200/cat.png \n\
[2020-07-01 00:00:00] Alison: back \n";
    assert_eq!(out, expected);
}

#[test]
fn html_transcript_grouping_and_metadata() {
    let (guild, messages) = reconstruct();
    let assets = MapAssets::with(&[("200", "attachments/5/200/cat.png")]);

    let mut out = Vec::new();
    HtmlRenderer::new()
        .render(&guild, CHANNEL_ID, &messages, &assets, &mut out)
        .unwrap();
    let out = String::from_utf8(out).unwrap();

    // alice x2, bob, alice again: three author blocks
    assert_eq!(out.matches("<div class=\"msg\">").count(), 3);

    // header fields resolve as of each block's first message
    assert!(out.contains("title=\"alice#1234\">Ali</span>"));
    assert!(out.contains("title=\"alice#1234\">Alison</span>"));
    assert!(out.contains("style=\"color: #ff0000\""));

    // bob never stored an avatar: discriminator fallback (7 % 5 = 2)
    assert!(out.contains("src=\"embed/avatars/2.png\""));

    // markup converted, mention wrapped, channel mention left literal
    assert!(out.contains("hello <strong>world</strong> <span class=\"mention\">@bob</span>"));
    assert!(out.contains("check &lt;#77&gt; out"));

    // the early attachment event landed on bob's later message
    assert!(out.contains("<img class=\"msg-attachment\" src=\"attachments/5/200/cat.png\">"));
}

#[test]
fn deleted_message_leaves_no_trace() {
    let (_, messages) = reconstruct();

    let deleted = snowflake_at(instant(2020, 7, 1, 0, 1, 0));
    assert!(messages.iter().all(|m| m.id != deleted));
    assert!(messages
        .iter()
        .all(|m| m.content.as_deref() != Some("never mind")));
}

#[test]
fn as_of_resolution_follows_send_time() {
    let (guild, messages) = reconstruct();

    // january message renders the january nickname even though the june
    // rename appears later in the guild log
    let january = messages[0].created_at();
    assert_eq!(
        guild
            .member_at(Snowflake::new(10), january)
            .unwrap()
            .display_name(),
        "Ali"
    );

    let july = messages.last().unwrap().created_at();
    assert_eq!(
        guild
            .member_at(Snowflake::new(10), july)
            .unwrap()
            .display_name(),
        "Alison"
    );
}
