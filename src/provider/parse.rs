// Small parsing helpers shared by adapter parsers.

use std::net::Ipv4Addr;
use std::str::FromStr;

/// Most DNS servers any chain reports.
pub const MAX_DNS_SERVERS: usize = 5;

pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn first_line(raw: &str) -> Option<String> {
    raw.lines().find_map(non_empty)
}

pub fn first_token(raw: &str) -> Option<String> {
    raw.split_whitespace().next().map(str::to_string)
}

pub fn number<N: FromStr>(raw: &str) -> Option<N> {
    raw.trim().parse().ok()
}

/// Value of the first `key<sep>value` line, trimmed.
pub fn key_value<'a>(content: &'a str, key: &str, sep: char) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let (k, v) = line.split_once(sep)?;
        (k.trim() == key).then(|| v.trim()).filter(|v| !v.is_empty())
    })
}

/// Last path component, for `/bin/zsh` or `C:\Windows\system32\cmd.exe`.
pub fn basename(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let name = trimmed.rsplit(['/', '\\']).next()?;
    non_empty(name)
}

/// A routable IPv4 address: not loopback, link-local or unspecified.
pub fn usable_ipv4(raw: &str) -> Option<String> {
    let addr: Ipv4Addr = raw.trim().parse().ok()?;
    (!addr.is_loopback() && !addr.is_link_local() && !addr.is_unspecified())
        .then(|| addr.to_string())
}

/// Any IPv4 or IPv6 literal, scope suffix stripped.
pub fn ip_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let addr = trimmed.split('%').next()?;
    addr.parse::<std::net::IpAddr>()
        .ok()
        .map(|_| addr.to_string())
}

/// First-seen order, duplicates dropped, at most `MAX_DNS_SERVERS`. Empty becomes `None`.
pub fn dns_list(servers: impl IntoIterator<Item = String>) -> Option<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for server in servers {
        if out.len() == MAX_DNS_SERVERS {
            break;
        }
        if !out.contains(&server) {
            out.push(server);
        }
    }
    (!out.is_empty()).then_some(out)
}

/// Short excerpt of unparseable output for debug logs.
pub fn excerpt(raw: &str) -> String {
    raw.trim().chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_matches_whole_key() {
        let content = "Socket(s):  2\nCore(s) per socket: 8\n";
        assert_eq!(key_value(content, "Socket(s)", ':'), Some("2"));
        assert_eq!(key_value(content, "Core(s)", ':'), None);
    }

    #[test]
    fn usable_ipv4_rejects_local_addresses() {
        assert_eq!(usable_ipv4("192.168.1.20"), Some("192.168.1.20".into()));
        assert_eq!(usable_ipv4("127.0.0.1"), None);
        assert_eq!(usable_ipv4("169.254.3.4"), None);
        assert_eq!(usable_ipv4("fe80::1"), None);
    }

    #[test]
    fn dns_list_dedupes_and_caps() {
        let servers = ["1.1.1.1", "8.8.8.8", "1.1.1.1", "9.9.9.9", "8.8.4.4", "1.0.0.1", "4.4.4.4"];
        let list = dns_list(servers.iter().map(|s| s.to_string())).expect("servers");
        assert_eq!(list, vec!["1.1.1.1", "8.8.8.8", "9.9.9.9", "8.8.4.4", "1.0.0.1"]);
        assert_eq!(dns_list(Vec::new()), None);
    }

    #[test]
    fn basename_handles_both_separators() {
        assert_eq!(basename("/usr/bin/zsh\n"), Some("zsh".into()));
        assert_eq!(basename(r"C:\Windows\system32\cmd.exe"), Some("cmd.exe".into()));
    }

    #[test]
    fn ip_literal_strips_scope() {
        assert_eq!(ip_literal("fe80::1%eth0"), Some("fe80::1".into()));
        assert_eq!(ip_literal("not-an-ip"), None);
    }
}
