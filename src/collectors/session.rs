// Session collector: user, last login, shell, terminal, locale

use crate::host::Host;
use crate::models::{LOGIN_UNAVAILABLE, LastLogin, NEVER_LOGGED_IN, SessionFacts};
use crate::platform::Platform;
use crate::policy::{FastModePolicy, FieldKey};
use crate::provider::{Probe, ProviderChain, parse};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub async fn collect<H: Host>(host: &H, policy: &FastModePolicy) -> SessionFacts {
    let platform = host.platform();
    let (username, shell, terminal, locale) = tokio::join!(
        username_chain(platform).resolve(host, policy),
        shell_chain(platform).resolve(host, policy),
        terminal_chain().resolve(host, policy),
        locale_chain(platform).resolve(host, policy),
    );
    let username = username.found();
    let user = username.as_ref().map(|f| f.value.as_str());
    let last_login = last_login_chain(platform, user)
        .resolve(host, policy)
        .await
        .found();

    SessionFacts {
        username,
        last_login,
        shell: shell.found(),
        terminal: terminal.found(),
        locale: locale.found(),
    }
}

fn username_chain(platform: Platform) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::Username);
    let chain = if platform == Platform::Windows {
        chain.probe("env-username", Probe::env("USERNAME"), parse::non_empty)
    } else {
        chain
            .probe("env-user", Probe::env("USER"), parse::non_empty)
            .probe("env-logname", Probe::env("LOGNAME"), parse::non_empty)
    };
    chain.probe("whoami", Probe::command("whoami", &[]), parse_whoami)
}

/// Modern tool, legacy tool, generic session log, then the sentinel. Never exhausted.
pub fn last_login_chain(platform: Platform, user: Option<&str>) -> ProviderChain<LastLogin> {
    let mut chain = ProviderChain::new(FieldKey::LastLogin);
    if let Some(user) = user {
        chain = match platform {
            Platform::Linux => chain
                .probe(
                    "lastlog2",
                    Probe::command("lastlog2", &["--user", user]),
                    parse_lastlog,
                )
                .probe("lastlog", Probe::command("lastlog", &["-u", user]), parse_lastlog)
                .probe("last", Probe::command("last", &["-1", user]), parse_last),
            Platform::MacOs => chain.probe("last", Probe::command("last", &["-1", user]), parse_last),
            Platform::Windows => {
                chain.probe("net-user", Probe::command("net", &["user", user]), parse_net_user_login)
            }
            Platform::Other => chain,
        };
    }
    chain.ready("unavailable", Some(LastLogin::at(LOGIN_UNAVAILABLE)))
}

fn shell_chain(platform: Platform) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::Shell).probe("env-shell", Probe::env("SHELL"), parse::basename);
    if platform == Platform::Windows {
        chain
            .probe(
                "psversion",
                Probe::powershell("$PSVersionTable.PSVersion.ToString()"),
                |raw| parse::first_line(raw).map(|v| format!("PowerShell {v}")),
            )
            .probe("env-comspec", Probe::env("COMSPEC"), parse::basename)
    } else {
        chain
    }
}

fn terminal_chain() -> ProviderChain<String> {
    ProviderChain::new(FieldKey::Terminal)
        .probe("env-term-program", Probe::env("TERM_PROGRAM"), parse::non_empty)
        .probe("env-wt-session", Probe::env("WT_SESSION"), |_| {
            Some("Windows Terminal".to_string())
        })
        .probe("env-term", Probe::env("TERM"), parse::non_empty)
        .probe("env-conemu", Probe::env("ConEmuANSI"), |_| Some("ConEmu".to_string()))
}

fn locale_chain(platform: Platform) -> ProviderChain<String> {
    if platform == Platform::Windows {
        return ProviderChain::new(FieldKey::Locale).probe(
            "get-culture",
            Probe::powershell("(Get-Culture).Name"),
            parse::first_line,
        );
    }
    ProviderChain::new(FieldKey::Locale)
        .probe("env-lc-all", Probe::env("LC_ALL"), parse::non_empty)
        .probe("env-lang", Probe::env("LANG"), parse::non_empty)
}

/// `DOMAIN\user` -> `user`
fn parse_whoami(raw: &str) -> Option<String> {
    let line = parse::first_line(raw)?;
    parse::non_empty(line.rsplit('\\').next().unwrap_or_default())
}

/// Splits `<user> <tty> [from] <weekday> ...` around the first weekday token.
fn split_login_row(row: &str) -> Option<(Option<String>, Vec<&str>)> {
    let tokens: Vec<&str> = row.split_whitespace().collect();
    let day = tokens
        .iter()
        .skip(2)
        .position(|t| WEEKDAYS.contains(t))?
        + 2;
    let from = (day == 3)
        .then(|| tokens[2])
        .filter(|f| !f.starts_with(':') && !f.starts_with("tty") && !f.starts_with("pts"))
        .map(str::to_string);
    Some((from, tokens[day..].to_vec()))
}

/// `lastlog`/`lastlog2`: header line, then `<user> <port> [from] <date...>`.
pub(crate) fn parse_lastlog(raw: &str) -> Option<LastLogin> {
    let row = raw.lines().skip(1).find(|l| !l.trim().is_empty())?;
    if row.contains("Never logged in") {
        return Some(LastLogin::at(NEVER_LOGGED_IN));
    }
    let (from, date) = split_login_row(row)?;
    Some(LastLogin {
        when: date.join(" "),
        from,
    })
}

/// `last -1 <user>`: `<user> <tty> [from] Mon Jan  1 10:00   still logged in`.
pub(crate) fn parse_last(raw: &str) -> Option<LastLogin> {
    let row = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("wtmp") && !l.starts_with("btmp"))?;
    let (from, date) = split_login_row(row)?;
    let when: Vec<&str> = date.into_iter().take(4).collect();
    Some(LastLogin {
        when: when.join(" "),
        from,
    })
}

/// `net user <name>`: `Last logon                   1/2/2024 10:00:00 AM`.
fn parse_net_user(raw: &str) -> Option<String> {
    raw.lines()
        .find_map(|line| line.strip_prefix("Last logon"))
        .and_then(parse::non_empty)
}

fn parse_net_user_login(raw: &str) -> Option<LastLogin> {
    let when = parse_net_user(raw)?;
    if when.eq_ignore_ascii_case("never") {
        return Some(LastLogin::at(NEVER_LOGGED_IN));
    }
    Some(LastLogin::at(when))
}
