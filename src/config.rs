use clap::Parser;

use crate::core::AddressPreference;

// WHOIS constants
pub const CYMRU_WHOIS_SERVER: &str = "whois.cymru.com";
pub const DEFAULT_WHOIS_PORT: u16 = 43;
pub const TIMEOUT_SECONDS: u64 = 10;
pub const MAX_RESPONSE_BYTES: usize = 1_048_576;

pub const PROMPT: &str = "Please enter an IP address or domain name for ASN lookup: ";

// Special-purpose IPv4 blocks (prefix, name, reference)
pub const RESERVED_IPV4_RANGES: &[(&str, &str, &str)] = &[
    ("0.0.0.0/8", "This Network", "RFC 1122, Section 3.2.1.3"),
    ("10.0.0.0/8", "Private-Use Networks", "RFC 1918"),
    ("100.64.0.0/10", "Shared Address Space", "RFC 6598"),
    ("127.0.0.0/8", "Loopback", "RFC 1122, Section 3.2.1.3"),
    ("169.254.0.0/16", "Link Local", "RFC 3927"),
    ("172.16.0.0/12", "Private-Use Networks", "RFC 1918"),
    ("192.0.0.0/24", "IETF Protocol Assignments", "RFC 6890"),
    ("192.0.2.0/24", "TEST-NET-1", "RFC 5737"),
    ("192.88.99.0/24", "6to4 Relay Anycast", "RFC 3068"),
    ("192.168.0.0/16", "Private-Use Networks", "RFC 1918"),
    ("198.18.0.0/15", "Network Interconnect Device Benchmark Testing", "RFC 2544"),
    ("198.51.100.0/24", "TEST-NET-2", "RFC 5737"),
    ("203.0.113.0/24", "TEST-NET-3", "RFC 5737"),
    ("224.0.0.0/4", "Multicast", "RFC 3171"),
    ("240.0.0.0/4", "Reserved for Future Use", "RFC 6890"),
    ("255.255.255.255/32", "Limited Broadcast", "RFC 919, Section 7"),
];

pub const RESERVED_IPV6_RANGES: &[(&str, &str, &str)] = &[
    ("::/128", "Unspecified", "RFC 4291, Section 2.5.2"),
    ("::1/128", "Loopback", "RFC 4291, Section 2.5.3"),
    ("100::/64", "Discard-Only Address Block", "RFC 6666"),
    ("2001:db8::/32", "Documentation", "RFC 3849"),
    ("fc00::/7", "Unique Local Unicast", "RFC 4193"),
    ("fe80::/10", "Link-Local Unicast", "RFC 4291, Section 2.5.6"),
    ("fec0::/10", "Site-Local", "RFC 4291, Section 2.5.7"),
    ("ff00::/8", "Multicast", "RFC 4291, Section 2.7"),
];

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Resolve an IP address or domain name and look up its ASN"
)]
pub struct Cli {
    /// IP address or domain name (prompted for when omitted)
    pub target: Option<String>,

    /// Only use IPv4 addresses when resolving a domain
    #[arg(short = '4', long, conflicts_with = "ipv6")]
    pub ipv4: bool,

    /// Only use IPv6 addresses when resolving a domain
    #[arg(short = '6', long)]
    pub ipv6: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the RDAP network details
    #[arg(long)]
    pub no_network: bool,

    /// Team Cymru compatible WHOIS server
    #[arg(long, default_value = CYMRU_WHOIS_SERVER)]
    pub whois_server: String,

    /// WHOIS server port
    #[arg(long, default_value_t = DEFAULT_WHOIS_PORT)]
    pub whois_port: u16,

    /// WHOIS timeout in seconds
    #[arg(long, default_value_t = TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    pub fn address_preference(&self) -> AddressPreference {
        if self.ipv4 {
            AddressPreference::Ipv4Only
        } else if self.ipv6 {
            AddressPreference::Ipv6Only
        } else {
            AddressPreference::Any
        }
    }
}
