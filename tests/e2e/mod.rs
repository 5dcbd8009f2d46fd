// End-to-end tests for the TTS Maker proxy, client and form.
//
// Every test gets its own proxy and fake vendor, each bound to an ephemeral
// port, so tests run in parallel without sharing state.
//
// Architecture:
// - FakeVendor records each speech request and answers with canned audio or
//   a canned error
// - The proxy router is built with `create_router`, exactly as in `main`
// - TestClient speaks raw HTTP to the proxy; the library client and form are
//   exercised against the same servers

mod test_form;
mod test_synthesize;
