/*! Integration tests for Folio.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - ordering: move properties and collection id guarantees
 * - session: dirty tracking of the edit session
 * - sync: document and order synchronizers, including partial failures
 * - backend: the record and document stores (InMemory and SQLite)
 * - content: About document migration and project records
 * - admin: the About editor and the project board end to end
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("folio=info".parse().unwrap()))
        .with_test_writer()
        .try_init();
}

mod admin;
mod backend;
mod content;
mod ordering;
mod sync;
