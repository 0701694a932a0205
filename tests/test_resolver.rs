mod common;

use common::WebRoot;
use http07::config::{RoutingConfig, RoutingMode, ServerConfig};
use http07::http::request::ParsedRequest;
use http07::http::resolver::{resolve, ErrorResource, MessageTable, ResourceLocator, Resolver};

fn valid(path: &str) -> ParsedRequest {
    ParsedRequest::Valid(path.to_string())
}

fn routing(root: &WebRoot) -> RoutingConfig {
    RoutingConfig::new(root.path(), "index.html")
}

#[test]
fn test_resolve_root_serves_default_page() {
    let root = WebRoot::new("root-default");
    let index = root.file("index.html", "home");

    let locator = resolve(&valid("/"), &routing(&root));

    assert_eq!(locator, ResourceLocator::FileResource(index));
}

#[test]
fn test_resolve_empty_path_serves_default_page() {
    let root = WebRoot::new("empty-path");
    let index = root.file("index.html", "home");

    let locator = resolve(&valid(""), &routing(&root));

    assert_eq!(locator, ResourceLocator::FileResource(index));
}

#[test]
fn test_resolve_plain_file() {
    let root = WebRoot::new("plain-file");
    let doc = root.file("docs/readme.txt", "hello");

    assert_eq!(
        resolve(&valid("/docs/readme.txt"), &routing(&root)),
        ResourceLocator::FileResource(doc.clone())
    );
    // Without the leading slash the path is still taken relative to the root.
    assert_eq!(
        resolve(&valid("docs/readme.txt"), &routing(&root)),
        ResourceLocator::FileResource(doc)
    );
}

#[test]
fn test_resolve_subdirectory_uses_default_page() {
    let root = WebRoot::new("subdir");
    let index = root.file("blog/index.html", "blog");

    assert_eq!(
        resolve(&valid("/blog"), &routing(&root)),
        ResourceLocator::FileResource(index.clone())
    );
    assert_eq!(
        resolve(&valid("/blog/"), &routing(&root)),
        ResourceLocator::FileResource(index)
    );
}

#[test]
fn test_resolve_custom_default_page_name() {
    let root = WebRoot::new("custom-default");
    let home = root.file("home.htm", "home");
    let config = RoutingConfig::new(root.path(), "home.htm");

    assert_eq!(
        resolve(&valid("/"), &config),
        ResourceLocator::FileResource(home)
    );
}

#[test]
fn test_resolve_directory_without_default_page_is_not_found() {
    let root = WebRoot::new("no-default");
    root.dir("empty");

    assert_eq!(
        resolve(&valid("/empty"), &routing(&root)),
        ResourceLocator::ErrorResource(ErrorResource::NotFound)
    );
}

#[test]
fn test_resolve_missing_file_is_not_found() {
    let root = WebRoot::new("missing");
    root.file("index.html", "home");

    assert_eq!(
        resolve(&valid("/nope.html"), &routing(&root)),
        ResourceLocator::ErrorResource(ErrorResource::NotFound)
    );
}

#[test]
fn test_resolve_malformed_is_bad_request_regardless_of_config() {
    let root = WebRoot::new("malformed");
    root.file("index.html", "home");

    assert_eq!(
        resolve(&ParsedRequest::Malformed, &routing(&root)),
        ResourceLocator::ErrorResource(ErrorResource::BadRequest)
    );
    assert_eq!(
        resolve(
            &ParsedRequest::Malformed,
            &RoutingConfig::new("/definitely/not/here", "")
        ),
        ResourceLocator::ErrorResource(ErrorResource::BadRequest)
    );
}

#[test]
fn test_resolve_parent_traversal_is_not_found() {
    let root = WebRoot::new("traversal");
    root.file("public/index.html", "public");
    root.file("secret.txt", "secret");
    let config = RoutingConfig::new(root.path().join("public"), "index.html");

    assert_eq!(
        resolve(&valid("/../secret.txt"), &config),
        ResourceLocator::ErrorResource(ErrorResource::NotFound)
    );
    assert_eq!(
        resolve(&valid("/a/../../secret.txt"), &config),
        ResourceLocator::ErrorResource(ErrorResource::NotFound)
    );
}

#[test]
fn test_resolve_double_slash_is_not_treated_as_absolute() {
    let root = WebRoot::new("double-slash");
    root.file("index.html", "home");

    assert_eq!(
        resolve(&valid("//etc/passwd"), &routing(&root)),
        ResourceLocator::ErrorResource(ErrorResource::NotFound)
    );
}

#[test]
fn test_resolve_nul_byte_path_is_internal_error() {
    let root = WebRoot::new("nul-byte");
    root.file("index.html", "home");

    assert_eq!(
        resolve(&valid("/a\0b"), &routing(&root)),
        ResourceLocator::ErrorResource(ErrorResource::InternalError)
    );
}

#[test]
fn test_resolve_is_idempotent() {
    let root = WebRoot::new("idempotent");
    root.file("index.html", "home");
    let config = routing(&root);

    for path in ["/", "/index.html", "/missing"] {
        let first = resolve(&valid(path), &config);
        let second = resolve(&valid(path), &config);
        assert_eq!(first, second);
    }
}

#[test]
fn test_message_table_lookup() {
    let table = MessageTable::default();

    assert_eq!(
        table.resolve(&valid("/greeting")),
        ResourceLocator::StaticMessage("hello world".to_string())
    );
    assert_eq!(
        table.resolve(&valid("/")),
        ResourceLocator::StaticMessage("index".to_string())
    );
}

#[test]
fn test_message_table_matches_verbatim() {
    let table = MessageTable::default();

    assert_eq!(
        table.resolve(&valid("greeting")),
        ResourceLocator::ErrorResource(ErrorResource::NotFound)
    );
    assert_eq!(
        table.resolve(&valid("/greeting/")),
        ResourceLocator::ErrorResource(ErrorResource::NotFound)
    );
}

#[test]
fn test_message_table_malformed_is_bad_request() {
    let table = MessageTable::new([("/".to_string(), "x".to_string())]);

    assert_eq!(table.len(), 1);
    assert_eq!(
        table.resolve(&ParsedRequest::Malformed),
        ResourceLocator::ErrorResource(ErrorResource::BadRequest)
    );
}

#[test]
fn test_resolver_follows_mode() {
    let root = WebRoot::new("mode");
    let index = root.file("index.html", "home");

    let mut cfg = ServerConfig::default();
    cfg.routing = routing(&root);

    let files = Resolver::from_config(&cfg);
    assert_eq!(files.resolve(&valid("/")), ResourceLocator::FileResource(index));

    cfg.mode = RoutingMode::Messages;
    let messages = Resolver::from_config(&cfg);
    assert_eq!(
        messages.resolve(&valid("/")),
        ResourceLocator::StaticMessage("index".to_string())
    );
}
