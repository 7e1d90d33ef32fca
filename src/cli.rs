// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::{HostSet, NumericSet};

#[derive(Parser, Debug)]
#[command(
    name = "hostlist",
    version,
    about = "Expand, compress and combine host list expressions",
    long_about = "hostlist manipulates bracketed host list expressions such as node[1-128] or\nrack[2-4]node[01-20].dc1. Every subcommand parses its arguments into a canonical,\nduplicate-free set before printing the result.",
    after_help = "EXAMPLES:\n  Expand a range:          hostlist expand \"quartz[4-8]\"\n  Compress host names:     hostlist compress \"node1,node2,node3,node4\"\n  Count distinct hosts:    hostlist count \"node[1-4],node[1-4]\"\n  Remove hosts:            hostlist subtract \"node[1-10]\" \"node[3-4]\"\n  Common hosts:            hostlist intersect \"node[1-10]\" \"node[8-12]\"\n  Numeric ranks:           hostlist --numeric compress \"[3,1-2]\""
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'n',
        long,
        global = true,
        help = "Treat every argument as a bracketed numeric list such as [0-3,7]"
    )]
    pub numeric: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Print every host, fully spelled out")]
    Expand {
        #[arg(help = "Host list expression")]
        hosts: String,

        #[arg(
            short = 's',
            long,
            default_value = ",",
            help = "Separator placed between expanded hosts"
        )]
        separator: String,
    },

    #[command(about = "Print the canonical bracketed form")]
    Compress {
        #[arg(help = "Host list expression")]
        hosts: String,
    },

    #[command(about = "Print the number of distinct hosts")]
    Count {
        #[arg(help = "Host list expression")]
        hosts: String,
    },

    #[command(about = "Print the hosts of the first list that are not in the second")]
    Subtract {
        #[arg(help = "Host list expression")]
        hosts: String,

        #[arg(help = "Hosts to remove")]
        exclude: String,
    },

    #[command(about = "Print the hosts common to both lists")]
    Intersect {
        #[arg(help = "Host list expression")]
        hosts: String,

        #[arg(help = "Host list expression to intersect with")]
        other: String,
    },
}

impl Cli {
    /// Run the selected subcommand, returning the line to print
    pub fn execute(&self) -> Result<String> {
        debug!(command = ?self.command, numeric = self.numeric, "executing");
        if self.numeric {
            execute_numeric(&self.command)
        } else {
            execute_hosts(&self.command)
        }
    }
}

fn parse_set(hosts: &str) -> Result<HostSet> {
    HostSet::create(hosts).with_context(|| format!("Failed to parse host list {hosts:?}"))
}

fn parse_numeric(input: &str) -> Result<NumericSet> {
    NumericSet::create(input).with_context(|| format!("Failed to parse numeric list {input:?}"))
}

fn execute_hosts(command: &Commands) -> Result<String> {
    let output = match command {
        Commands::Expand { hosts, separator } => {
            parse_set(hosts)?.slice().join(separator.as_str())
        }
        Commands::Compress { hosts } => parse_set(hosts)?.ranged_string(),
        Commands::Count { hosts } => parse_set(hosts)?.count().to_string(),
        Commands::Subtract { hosts, exclude } => {
            let set = parse_set(hosts)?;
            if !set.is_empty() {
                set.delete(exclude)
                    .with_context(|| format!("Failed to remove {exclude:?}"))?;
            }
            set.ranged_string()
        }
        Commands::Intersect { hosts, other } => parse_set(hosts)?
            .intersects(other)
            .with_context(|| format!("Failed to intersect with {other:?}"))?
            .ranged_string(),
    };
    Ok(output)
}

fn execute_numeric(command: &Commands) -> Result<String> {
    let output = match command {
        Commands::Expand { hosts, separator } => parse_numeric(hosts)?
            .slice()
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(separator.as_str()),
        Commands::Compress { hosts } => parse_numeric(hosts)?.ranged_string(),
        Commands::Count { hosts } => parse_numeric(hosts)?.count().to_string(),
        Commands::Subtract { hosts, exclude } => {
            let set = parse_numeric(hosts)?;
            for num in parse_numeric(exclude)?.slice() {
                set.delete(num);
            }
            set.ranged_string()
        }
        Commands::Intersect { hosts, other } => {
            let set = parse_numeric(hosts)?;
            let other = parse_numeric(other)?;
            NumericSet::from_values(set.slice().into_iter().filter(|num| other.contains(*num)))
                .ranged_string()
        }
    };
    Ok(output)
}
