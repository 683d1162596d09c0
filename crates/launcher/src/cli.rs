// SPDX-License-Identifier: MIT

//! Root argument parsing: positional target
//! hostnames only. Non-root launchers never reach this — they inherit
//! their parameters from their parent over the wire.

use clap::Parser;

/// `spawntree host1 host2 … hostM` — the launcher itself is always rank 0;
/// each positional argument names one more launcher rank's host.
#[derive(Debug, Parser)]
#[command(name = "spawntree", about = "Hierarchical process launcher and bootstrap runtime")]
pub struct RootArgs {
    /// Target hostnames for ranks 1..M, in rank order.
    pub hosts: Vec<String>,
}

impl RootArgs {
    pub fn parse_args() -> Self {
        RootArgs::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        RootArgs::command().debug_assert();
    }

    #[test]
    fn positional_hosts_collect_in_order() {
        let args = RootArgs::parse_from(["spawntree", "host1", "host2", "host3"]);
        assert_eq!(args.hosts, vec!["host1", "host2", "host3"]);
    }

    #[test]
    fn no_hosts_is_a_single_rank_job() {
        let args = RootArgs::parse_from(["spawntree"]);
        assert!(args.hosts.is_empty());
    }
}
