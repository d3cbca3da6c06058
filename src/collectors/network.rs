// Network collector: machine IP, SSH client IP, DNS resolvers

use serde::Deserialize;

use crate::host::Host;
use crate::models::NetworkFacts;
use crate::platform::Platform;
use crate::policy::{FastModePolicy, FieldKey};
use crate::provider::{Probe, ProviderChain, parse};

/// Interfaces whose addresses never identify the machine.
const VIRTUAL_PREFIXES: &[&str] = &["docker", "br-", "veth", "virbr", "lo"];

pub async fn collect<H: Host>(host: &H, policy: &FastModePolicy) -> NetworkFacts {
    let platform = host.platform();
    let (machine_ip, client_ip, dns_servers) = tokio::join!(
        machine_ip_chain(platform).resolve(host, policy),
        client_ip_chain().resolve(host, policy),
        dns_chain(platform).resolve(host, policy),
    );
    NetworkFacts {
        machine_ip: machine_ip.found(),
        client_ip: client_ip.found(),
        dns_servers: dns_servers.found(),
    }
}

pub fn machine_ip_chain(platform: Platform) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::MachineIp);
    match platform {
        Platform::Linux => chain
            .probe(
                "ip-json",
                Probe::command("ip", &["-j", "-4", "addr", "show", "scope", "global"]),
                parse_ip_json,
            )
            .probe("hostname-i", Probe::command("hostname", &["-I"]), parse_first_usable)
            .probe("ip-route", Probe::command("ip", &["route", "get", "1"]), parse_route_src),
        Platform::MacOs => chain
            .probe(
                "ipconfig-getifaddr",
                Probe::command("ipconfig", &["getifaddr", "en0"]),
                parse_first_usable,
            )
            .probe("ifconfig", Probe::command("ifconfig", &[]), parse_ifconfig)
            .chained(
                "route-default",
                Probe::command("route", &["-n", "get", "default"]),
                |raw| {
                    let iface = parse::key_value(raw, "interface", ':')?;
                    Some(Probe::command("ipconfig", &["getifaddr", iface]))
                },
                parse_first_usable,
            ),
        Platform::Windows => chain
            .probe(
                "get-netipaddress",
                Probe::powershell(
                    "Get-NetIPAddress -AddressFamily IPv4 | \
                     Where-Object { $_.InterfaceAlias -notmatch 'Loopback' -and $_.PrefixOrigin -ne 'WellKnown' } | \
                     Select-Object -ExpandProperty IPAddress",
                ),
                parse_first_usable,
            )
            .probe("ipconfig", Probe::command("ipconfig", &[]), parse_ipconfig_ipv4)
            .probe(
                "route-print",
                Probe::command("route", &["print", "-4", "0.0.0.0"]),
                parse_route_print,
            ),
        Platform::Other => chain,
    }
}

fn client_ip_chain() -> ProviderChain<String> {
    ProviderChain::new(FieldKey::ClientIp)
        .probe("ssh-client", Probe::env("SSH_CLIENT"), parse_ssh_peer)
        .probe("ssh-connection", Probe::env("SSH_CONNECTION"), parse_ssh_peer)
}

pub fn dns_chain(platform: Platform) -> ProviderChain<Vec<String>> {
    let chain = ProviderChain::new(FieldKey::DnsServers);
    match platform {
        Platform::Linux => chain
            .probe("resolvectl", Probe::command("resolvectl", &["dns"]), parse_resolvectl)
            .probe("resolv-conf", Probe::file("/etc/resolv.conf"), parse_resolv_conf)
            .probe(
                "nmcli",
                Probe::command("nmcli", &["-t", "-f", "IP4.DNS", "dev", "show"]),
                parse_nmcli,
            ),
        Platform::MacOs => chain
            .probe("scutil-dns", Probe::command("scutil", &["--dns"]), parse_scutil_dns)
            .probe("resolv-conf", Probe::file("/etc/resolv.conf"), parse_resolv_conf)
            .probe(
                "networksetup",
                Probe::command("networksetup", &["-getdnsservers", "Wi-Fi"]),
                parse_address_lines,
            ),
        Platform::Windows => chain
            .probe(
                "get-dnsclientserveraddress",
                Probe::powershell(
                    "Get-DnsClientServerAddress -AddressFamily IPv4 | \
                     Select-Object -ExpandProperty ServerAddresses",
                ),
                parse_address_lines,
            )
            .probe("ipconfig-all", Probe::command("ipconfig", &["/all"]), parse_ipconfig_dns),
        Platform::Other => chain,
    }
}

#[derive(Deserialize)]
struct IpLink {
    #[serde(default)]
    ifname: String,
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    addr_info: Vec<IpAddrInfo>,
}

#[derive(Deserialize)]
struct IpAddrInfo {
    #[serde(default)]
    family: String,
    #[serde(default)]
    local: String,
}

/// `ip -j addr`: first global IPv4 on an UP, non-virtual interface.
pub(crate) fn parse_ip_json(raw: &str) -> Option<String> {
    let links: Vec<IpLink> = serde_json::from_str(raw).ok()?;
    links
        .iter()
        .filter(|link| link.flags.iter().any(|f| f == "UP"))
        .filter(|link| !VIRTUAL_PREFIXES.iter().any(|p| link.ifname.starts_with(p)))
        .flat_map(|link| link.addr_info.iter())
        .filter(|addr| addr.family == "inet")
        .find_map(|addr| parse::usable_ipv4(&addr.local))
}

fn parse_first_usable(raw: &str) -> Option<String> {
    raw.split_whitespace().find_map(parse::usable_ipv4)
}

/// `1.0.0.0 via 192.168.1.1 dev eth0 src 192.168.1.23 uid 1000`
fn parse_route_src(raw: &str) -> Option<String> {
    let mut tokens = raw.split_whitespace();
    tokens.find(|t| *t == "src")?;
    tokens.next().and_then(parse::usable_ipv4)
}

fn parse_ifconfig(raw: &str) -> Option<String> {
    raw.lines()
        .filter_map(|line| line.trim().strip_prefix("inet "))
        .find_map(|rest| rest.split_whitespace().next().and_then(parse::usable_ipv4))
}

fn parse_ipconfig_ipv4(raw: &str) -> Option<String> {
    raw.lines()
        .filter(|line| line.contains("IPv4 Address"))
        .find_map(|line| {
            let (_, value) = line.rsplit_once(':')?;
            parse::usable_ipv4(value.trim().trim_end_matches("(Preferred)"))
        })
}

/// Interface column of the `0.0.0.0 0.0.0.0 <gateway> <interface> <metric>` row.
fn parse_route_print(raw: &str) -> Option<String> {
    raw.lines().find_map(|line| {
        let cols: Vec<&str> = line.split_whitespace().collect();
        match cols.as_slice() {
            ["0.0.0.0", "0.0.0.0", _gateway, interface, _metric, ..] => parse::usable_ipv4(interface),
            _ => None,
        }
    })
}

/// `SSH_CLIENT=203.0.113.7 51234 22`: the peer address is the first token.
fn parse_ssh_peer(raw: &str) -> Option<String> {
    raw.split_whitespace().next().and_then(parse::ip_literal)
}

/// `Global: 1.1.1.1` / `Link 2 (eth0): 192.168.1.1 fe80::1%eth0`
pub(crate) fn parse_resolvectl(raw: &str) -> Option<Vec<String>> {
    parse::dns_list(raw.lines().flat_map(|line| {
        line.split_once(": ")
            .map(|(_, servers)| servers)
            .unwrap_or_default()
            .split_whitespace()
            .filter_map(parse::ip_literal)
    }))
}

/// One `nameserver <addr>` per line; `#` and `;` start comments.
pub(crate) fn parse_resolv_conf(raw: &str) -> Option<Vec<String>> {
    parse::dns_list(raw.lines().filter_map(|line| {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            return None;
        }
        let mut tokens = line.split_whitespace();
        (tokens.next()? == "nameserver")
            .then(|| tokens.next().and_then(parse::ip_literal))
            .flatten()
    }))
}

/// `IP4.DNS[1]:192.168.1.1`
fn parse_nmcli(raw: &str) -> Option<Vec<String>> {
    parse::dns_list(raw.lines().filter_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.starts_with("IP4.DNS")
            .then(|| parse::ip_literal(value))
            .flatten()
    }))
}

/// `  nameserver[0] : 192.168.1.1`
fn parse_scutil_dns(raw: &str) -> Option<Vec<String>> {
    parse::dns_list(raw.lines().filter_map(|line| {
        let line = line.trim();
        if !line.starts_with("nameserver[") {
            return None;
        }
        let (_, value) = line.split_once(':')?;
        parse::ip_literal(value)
    }))
}

/// One address per line; prose such as "There aren't any DNS Servers set" is ignored.
fn parse_address_lines(raw: &str) -> Option<Vec<String>> {
    parse::dns_list(raw.lines().filter_map(parse::ip_literal))
}

/// `DNS Servers . . . : 192.168.1.1` followed by indented continuation lines.
fn parse_ipconfig_dns(raw: &str) -> Option<Vec<String>> {
    let mut servers = Vec::new();
    let mut in_block = false;
    for line in raw.lines() {
        if line.contains("DNS Servers") {
            in_block = true;
            if let Some((_, value)) = line.split_once(" : ")
                && let Some(ip) = parse::ip_literal(value)
            {
                servers.push(ip);
            }
            continue;
        }
        if in_block {
            match parse::ip_literal(line) {
                Some(ip) if line.starts_with(' ') => servers.push(ip),
                _ => in_block = false,
            }
        }
    }
    parse::dns_list(servers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP_JSON: &str = r#"[
        {"ifindex":3,"ifname":"docker0","flags":["BROADCAST","MULTICAST","UP"],"addr_info":[{"family":"inet","local":"172.17.0.1","prefixlen":16}]},
        {"ifindex":2,"ifname":"eth0","flags":["BROADCAST","MULTICAST","UP","LOWER_UP"],"addr_info":[{"family":"inet","local":"192.168.1.23","prefixlen":24,"scope":"global"}]}
    ]"#;

    #[test]
    fn ip_json_skips_virtual_interfaces() {
        assert_eq!(parse_ip_json(IP_JSON), Some("192.168.1.23".into()));
        assert_eq!(parse_ip_json("not json"), None);
    }

    #[test]
    fn route_src_token() {
        let raw = "1.0.0.0 via 192.168.1.1 dev eth0 src 192.168.1.23 uid 1000\n    cache\n";
        assert_eq!(parse_route_src(raw), Some("192.168.1.23".into()));
    }

    #[test]
    fn ifconfig_skips_loopback() {
        let raw = "lo0: flags=8049<UP,LOOPBACK>\n\tinet 127.0.0.1 netmask 0xff000000\nen0: flags=8863<UP>\n\tinet 10.0.0.12 netmask 0xffffff00 broadcast 10.0.0.255\n";
        assert_eq!(parse_ifconfig(raw), Some("10.0.0.12".into()));
    }

    #[test]
    fn ipconfig_ipv4_strips_preferred() {
        let raw = "   IPv4 Address. . . . . . . . . . . : 192.168.0.42(Preferred)\r\n";
        assert_eq!(parse_ipconfig_ipv4(raw), Some("192.168.0.42".into()));
    }

    #[test]
    fn route_print_default_route_interface() {
        let raw = "Network Destination        Netmask          Gateway       Interface  Metric\n          0.0.0.0          0.0.0.0      192.168.1.1    192.168.1.77     25\n";
        assert_eq!(parse_route_print(raw), Some("192.168.1.77".into()));
    }

    #[test]
    fn ssh_peer_first_token() {
        assert_eq!(parse_ssh_peer("203.0.113.7 51234 22"), Some("203.0.113.7".into()));
        assert_eq!(parse_ssh_peer(""), None);
    }

    #[test]
    fn resolvectl_global_and_links() {
        let raw = "Global: 1.1.1.1\nLink 2 (eth0): 192.168.1.1 fe80::1%eth0\nLink 3 (docker0):\n";
        assert_eq!(
            parse_resolvectl(raw),
            Some(vec!["1.1.1.1".into(), "192.168.1.1".into(), "fe80::1".into()])
        );
    }

    #[test]
    fn resolv_conf_ignores_comments() {
        let raw = "# Generated\n; old\nnameserver 9.9.9.9\nsearch lan\nnameserver 9.9.9.9\nnameserver 1.1.1.1\n";
        assert_eq!(
            parse_resolv_conf(raw),
            Some(vec!["9.9.9.9".into(), "1.1.1.1".into()])
        );
        assert_eq!(parse_resolv_conf("# nothing here\n"), None);
    }

    #[test]
    fn nmcli_terse_output() {
        assert_eq!(
            parse_nmcli("IP4.DNS[1]:192.168.1.1\nIP4.DNS[2]:8.8.8.8\n"),
            Some(vec!["192.168.1.1".into(), "8.8.8.8".into()])
        );
    }

    #[test]
    fn scutil_nameservers() {
        let raw = "resolver #1\n  nameserver[0] : 192.168.1.1\n  nameserver[1] : fe80::1\n";
        assert_eq!(
            parse_scutil_dns(raw),
            Some(vec!["192.168.1.1".into(), "fe80::1".into()])
        );
    }

    #[test]
    fn networksetup_prose_is_not_a_server() {
        assert_eq!(
            parse_address_lines("There aren't any DNS Servers set on Wi-Fi.\n"),
            None
        );
    }

    #[test]
    fn ipconfig_all_continuation_lines() {
        let raw = "   DNS Servers . . . . . . . . . . . : 192.168.1.1\r\n                                       8.8.8.8\r\n   NetBIOS over Tcpip. . . . . . . . : Enabled\r\n";
        assert_eq!(
            parse_ipconfig_dns(raw),
            Some(vec!["192.168.1.1".into(), "8.8.8.8".into()])
        );
    }

    #[test]
    fn machine_ip_chain_order_per_platform() {
        assert_eq!(
            machine_ip_chain(Platform::Linux).strategy_names(),
            vec!["ip-json", "hostname-i", "ip-route"]
        );
        assert_eq!(
            machine_ip_chain(Platform::Windows).strategy_names(),
            vec!["get-netipaddress", "ipconfig", "route-print"]
        );
    }
}
