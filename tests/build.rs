use docsmith::build::{build_site, Docs, Error};
use docsmith::config::{Config, CONFIG_FILE_NAME};
use docsmith::handlers::Error as HandlerError;
use docsmith::url::url_for_request;
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

const BASE_TEMPLATE: &str = r##"<html>
<head><link rel="stylesheet" href="{{url .site.url "css/base.css"}}"></head>
<body>
<nav>{{range .site.nav}}{{template "item" .}}{{end}}</nav>
<h1>{{.page.title}}</h1>
<ol class="toc">{{range .page.sections}}<li><a href="#{{.id}}">{{.title}}</a></li>{{end}}</ol>
{{.page.content}}
{{if .page.previous}}<a rel="prev" href="{{.page.previous.url}}">{{.page.previous.title}}</a>{{end}}
{{if .page.next}}<a rel="next" href="{{.page.next.url}}">{{.page.next.title}}</a>{{end}}
</body>
</html>
"##;

const ITEM_PARTIAL: &str = r#"{{define "item"}}<li{{if .is_active}} class="active"{{end}}>{{if .is_header}}{{.title}}<ul>{{range .children}}{{template "item" .}}{{end}}</ul>{{else}}<a href="{{.url}}">{{.title}}</a>{{end}}</li>{{end}}"#;

const CONFIG: &str = "site_name: Example Docs
nav:
  - Home: index.md
  - Guide:
      - Setup: guide/setup.md
";

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn project(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, CONFIG_FILE_NAME, config);
    write(root, "templates/base.html", BASE_TEMPLATE);
    write(root, "templates/partials/item.html", ITEM_PARTIAL);
    write(root, "statics/css/base.css", "body { margin: 0 }");
    write(
        root,
        "docs/index.md",
        "# Welcome\n\nStart with [setup](guide/setup.md).\n",
    );
    write(
        root,
        "docs/guide/setup.md",
        "# Setup\n\n## Install\n\nRead https://example.com first.\n\n\
         > [!WARNING]\n> Back up first.\n\n## Install\n\n\
         ![diagram](img/flow.png) and [home](../index.md#welcome).\n",
    );
    write(root, "docs/guide/img/flow.png", "png");
    dir
}

fn read(root: &Path, path: &str) -> String {
    std::fs::read_to_string(root.join(path)).unwrap()
}

#[test]
fn test_build_writes_documents_and_assets() {
    let dir = project(CONFIG);
    let root = dir.path();
    let site = build_site(Config::from_directory(root).unwrap()).unwrap();

    assert!(root.join("site/index.html").is_file());
    assert!(root.join("site/guide/setup/index.html").is_file());
    assert_eq!("body { margin: 0 }", read(root, "site/css/base.css"));
    assert_eq!("png", read(root, "site/guide/img/flow.png"));
    assert!(site.warnings.is_empty());

    let roots = site.navigation.roots();
    assert_eq!(2, roots.len());
    let home = site.navigation.get(roots[0]);
    assert_eq!("Home", home.title);
    assert!(!home.is_header);
    let guide = site.navigation.get(roots[1]);
    assert_eq!("Guide", guide.title);
    assert!(guide.is_header);
    assert_eq!(1, guide.children.len());
    let setup = site.navigation.get(guide.children[0]);
    assert_eq!("Setup", setup.title);
    assert_eq!("/guide/setup/", setup.url);
    assert!(site.navigation.iter().all(|(_, node)| !node.is_active));
}

#[test]
fn test_rendered_page_contents() {
    let dir = project(CONFIG);
    let root = dir.path();
    build_site(Config::from_directory(root).unwrap()).unwrap();

    let setup = read(root, "site/guide/setup/index.html");
    assert!(setup.contains(r#"<link rel="stylesheet" href="/css/base.css">"#));
    assert!(setup.contains("<h1>Setup</h1>"));
    assert!(setup.contains(
        r##"<li><a href="#setup">Setup</a></li><li><a href="#install">Install</a></li><li><a href="#install-1">Install</a></li>"##
    ));
    assert!(setup.contains(r#"<h2 id="install-1">Install</h2>"#));
    assert!(setup.contains(r#"<a href="https://example.com">https://example.com</a>"#));
    assert!(setup.contains(r#"<div class="admonition warning">"#));
    assert!(setup.contains(r#"<img src="/guide/img/flow.png" alt="diagram" />"#));
    assert!(setup.contains(r#"<a href="/#welcome">home</a>"#));
    assert!(setup.contains(r#"<li class="active">Guide<ul><li class="active"><a href="/guide/setup/">Setup</a></li></ul></li>"#));
    assert!(setup.contains(r#"<li><a href="/">Home</a></li>"#));
    assert!(setup.contains(r#"<a rel="prev" href="/">Home</a>"#));
    assert!(!setup.contains(r#"rel="next""#));

    let home = read(root, "site/index.html");
    assert!(home.contains(r#"<a href="/guide/setup/">setup</a>"#));
    assert!(home.contains(r#"<li class="active"><a href="/">Home</a></li>"#));
    assert!(home.contains(r#"<li>Guide<ul>"#));
    assert!(home.contains(r#"<a rel="next" href="/guide/setup/">Setup</a>"#));
}

#[test]
fn test_serve() {
    let dir = project(CONFIG);
    let mut docs = Docs::new(Config::from_directory(dir.path()).unwrap()).unwrap();
    docs.initialize().unwrap();

    let page = String::from_utf8(docs.serve("/guide/setup/").unwrap().unwrap()).unwrap();
    assert!(page.contains("<h1>Setup</h1>"));
    assert_eq!(
        Some(b"body { margin: 0 }".to_vec()),
        docs.serve("/css/base.css").unwrap()
    );
    assert_eq!(None, docs.serve("/nope/").unwrap());
    assert!(docs.site().navigation.iter().all(|(_, node)| !node.is_active));
    assert!(!dir.path().join("site").exists());
}

#[test]
fn test_serve_percent_encoded_request() {
    let dir = project(CONFIG);
    write(dir.path(), "docs/guide/img/my file.png", "spaced");
    write(
        dir.path(),
        "docs/guide/deep/page.md",
        "[setup](/guide/setup.md) ![img](/guide/img/flow.png)",
    );
    let mut docs = Docs::new(Config::from_directory(dir.path()).unwrap()).unwrap();
    docs.initialize().unwrap();

    let url = url_for_request("/guide/img/my%20file.png?v=2", &docs.site().url).unwrap();
    assert_eq!(Some(b"spaced".to_vec()), docs.serve(&url).unwrap());

    let url = url_for_request("/guide/deep/page/", &docs.site().url).unwrap();
    let page = String::from_utf8(docs.serve(&url).unwrap().unwrap()).unwrap();
    assert!(page.contains(r#"<a href="/guide/setup/">setup</a>"#));
    assert!(page.contains(r#"<img src="/guide/img/flow.png" alt="img" />"#));
    assert!(docs.site().warnings.is_empty());
}

#[test]
fn test_dead_links_are_warnings() {
    let dir = project(CONFIG);
    write(dir.path(), "docs/broken.md", "[nowhere](missing.md)");
    let site = build_site(Config::from_directory(dir.path()).unwrap()).unwrap();

    let broken = read(dir.path(), "site/broken/index.html");
    assert!(broken.contains(r##"<a href="#">nowhere</a>"##));
    assert_eq!(1, site.warnings.len());
    assert_eq!("broken.md", site.warnings[0].origin);
    assert_eq!("missing.md", site.warnings[0].target);
}

#[test]
fn test_strict_build_fails_on_dead_link() {
    let dir = project(&format!("{}build:\n  strict: true\n", CONFIG));
    write(dir.path(), "docs/broken.md", "[nowhere](missing.md)");

    match build_site(Config::from_directory(dir.path()).unwrap()) {
        Err(Error::Handler(HandlerError::Annotated { path, err })) => {
            assert_eq!("broken.md", path);
            assert!(matches!(*err, HandlerError::Strict(_)));
        }
        Err(err) => panic!("unexpected error: {}", err),
        Ok(_) => panic!("strict build succeeded"),
    }
}

#[test]
fn test_base_url_prefixes_everything() {
    let dir = project(&format!("{}build:\n  url: /docs\n", CONFIG));
    let site = build_site(Config::from_directory(dir.path()).unwrap()).unwrap();

    let urls: Vec<&str> = site.documents.iter().map(|d| d.url.as_str()).collect();
    assert_eq!(vec!["/docs/", "/docs/guide/setup/"], urls);
    let setup = read(dir.path(), "site/guide/setup/index.html");
    assert!(setup.contains(r#"href="/docs/css/base.css""#));
    assert!(setup.contains(r#"<a rel="prev" href="/docs/">Home</a>"#));
}
