// SPDX-License-Identifier: MIT

//! `spawntree`: thin entrypoint. Parses root arguments, unfurls the tree,
//! waits for every locally forked child, and maps the result to a process
//! exit code.

use spawntree_core::debugger;
use spawntree_core::error::{Error, Result};
use spawntree_launcher::cli::RootArgs;
use spawntree_launcher::logging;
use spawntree_launcher::unfurl::unfurl;

fn main() {
    logging::init();
    let args = RootArgs::parse_args();

    match run(args.hosts) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "launcher exiting with failure");
            debugger::mark_aborting();
            std::process::exit(e.exit_code());
        }
    }
}

fn run(hosts: Vec<String>) -> Result<()> {
    let mut session = unfurl(hosts)?;
    let span = logging::launcher_span(session.tree.rank);
    let _guard = span.enter();

    // Step 7: wait until every locally forked child has exited.
    for child in session.waitable.iter_mut() {
        let status = child.wait().map_err(Error::Io)?;
        if !status.success() {
            return Err(Error::spawn(format!("child process exited with {status}")));
        }
    }
    Ok(())
}
