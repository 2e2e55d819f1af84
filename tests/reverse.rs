use routemap::{
    encode_uri_component, params, reverse_url, Options, ParamValue, Params, PatternError,
    Resolver, ReverseError,
};

macro_rules! reverse_tests {
    ($($name:ident {
        options = $options:expr,
        $( $route:literal , $params:expr => $expected:expr ),* $(,)?
    }),* $(,)?) => { $(
        #[test]
        fn $name() {
            let resolver = Resolver::with_options($options);

            $(
                let got = resolver.reverse($route, &$params);
                let expected: Result<&str, &str> = $expected;
                assert_eq!(
                    got.as_deref().map_err(ToString::to_string),
                    expected.map_err(str::to_owned),
                    "unexpected result for route '{}'",
                    $route
                );
            )*
        }
    )* };
}

reverse_tests! {
    static_routes {
        options = Options::default(),
        "test", Params::new() => Ok("test"),
        "/url/next", params! { "param" => 1 } => Ok("/url/next"),
        "", Params::new() => Ok(""),
        "/a)", Params::new() => Ok("/a)"),
    },
    required {
        options = Options::default(),
        "/:id", params! { "id" => 1 } => Ok("/1"),
        "/:id", params! { "id" => "1" } => Ok("/1"),
        "/:id/sub/:next", params! { "id" => 1, "next" => "test" } => Ok("/1/sub/test"),
        "/:id", Params::new() => Err("Expected \"id\" to be a string"),
        "/:id/sub/:next", params! { "id" => 1 } => Err("Expected \"next\" to be a string"),
        "/:id/sub/:next", Params::new() => Err("Expected \"id\" to be a string"),
    },
    optional {
        options = Options::default(),
        "/:id/sub/:next/:optional?", params! { "id" => 1, "next" => "test" } => Ok("/1/sub/test"),
        "/:id/sub/:next/:optional?", params! { "id" => 1, "next" => "test", "optional" => 5 } => Ok("/1/sub/test/5"),
        "/file.:ext?", Params::new() => Ok("/file"),
        "/file.:ext?", params! { "ext" => "json" } => Ok("/file.json"),
        "/:lang?/about", Params::new() => Ok("/about"),
    },
    extra_params_are_ignored {
        options = Options::default(),
        "/:id", params! { "id" => 1, "unused" => "x" } => Ok("/1"),
    },
    repeat {
        options = Options::default(),
        "/files/:path*", Params::new() => Ok("/files"),
        "/files/:path*", params! { "path" => Vec::<String>::new() } => Ok("/files"),
        "/files/:path*", params! { "path" => vec!["a", "b", "c"] } => Ok("/files/a/b/c"),
        "/files/:path*", params! { "path" => "a" } => Ok("/files/a"),
        "/files/:path+", params! { "path" => vec!["a"] } => Ok("/files/a"),
        "/files/:path+", Params::new() => Err("Expected \"path\" to be an array"),
        "/files/:path+", params! { "path" => Vec::<String>::new() } => Err("Expected \"path\" to not be empty"),
        "/:id", params! { "id" => vec![1, 2] } => Err("Expected \"id\" to not repeat, but got an array"),
    },
    custom_patterns {
        options = Options::default(),
        "/user/:id(\\d+)", params! { "id" => 42 } => Ok("/user/42"),
        "/user/:id(\\d+)", params! { "id" => "abc" } => Err("Expected \"id\" to match \"\\d+\", but got \"abc\""),
        "/(\\d+)", params! { "0" => 7 } => Ok("/7"),
        "/:ids(\\d+)+", params! { "ids" => vec!["1", "x"] } => Err("Expected all \"ids\" to match \"\\d+\", but got \"x\""),
        "/:kind(a|b)", params! { "kind" => "B" } => Ok("/B"),
    },
    default_pattern {
        options = Options::default(),
        "/:id", params! { "id" => "a/b" } => Err("Expected \"id\" to match \"[^\\/#\\?]+?\", but got \"a/b\""),
        "/:id", params! { "id" => "" } => Err("Expected \"id\" to match \"[^\\/#\\?]+?\", but got \"\""),
        "/:id", params! { "id" => "héllo" } => Ok("/héllo"),
    },
    groups {
        options = Options::default(),
        "/foo{-:bar}?", Params::new() => Ok("/foo"),
        "/foo{-:bar}?", params! { "bar" => "x" } => Ok("/foo-x"),
        "/list{/:page.html}?", params! { "page" => 2 } => Ok("/list/2.html"),
        "/tags{/:tag}*", params! { "tag" => vec!["a", "b"] } => Ok("/tags/a/b"),
    },
    escapes_and_prefixes {
        options = Options::default(),
        "/foo\\:bar", params! { "bar" => 1 } => Ok("/foo:bar"),
        "/user-:id", params! { "id" => 5 } => Ok("/user-5"),
        "/\\(:id\\)", params! { "id" => 5 } => Ok("/(5)"),
    },
    malformed {
        options = Options::default(),
        "/:", Params::new() => Err("Missing parameter name at 1"),
        "/(", Params::new() => Err("Unbalanced pattern at 1"),
        "/()", Params::new() => Err("Missing pattern at 1"),
        "/(?foo)", Params::new() => Err("Pattern cannot start with \"?\" at 2"),
        "/((a))", Params::new() => Err("Capturing groups are not allowed at 2"),
        "/{:id", Params::new() => Err("Unexpected END at 5, expected CLOSE"),
        "/?", Params::new() => Err("Unexpected MODIFIER at 1, expected END"),
        "/a}", Params::new() => Err("Unexpected CLOSE at 2, expected END"),
    },
    sensitive {
        options = Options::new().with_sensitive(true),
        "/:kind(a|b)", params! { "kind" => "a" } => Ok("/a"),
        "/:kind(a|b)", params! { "kind" => "B" } => Err("Expected \"kind\" to match \"a|b\", but got \"B\""),
    },
    unvalidated {
        options = Options::new().with_validate(false),
        "/:id", params! { "id" => "a/b" } => Ok("/a/b"),
        "/user/:id(\\d+)", params! { "id" => "abc" } => Ok("/user/abc"),
    },
    encoded {
        options = Options::new().with_encode(encode_uri_component),
        "/:id", params! { "id" => "a/b" } => Ok("/a%2Fb"),
        "/search/:q", params! { "q" => "rust lang" } => Ok("/search/rust%20lang"),
        "/files/:path*", params! { "path" => vec!["a b", "c"] } => Ok("/files/a%20b/c"),
    },
}

#[test]
fn missing_parameter_names_the_key() {
    let patterns = ["/:id", "/a/:id/b", "/:other?/:id", "{/:id}", "/:id(\\d+)"];

    for pattern in patterns {
        let err = reverse_url(pattern, &Params::new()).unwrap_err();
        assert_eq!(err.param(), Some("id"), "{}", pattern);
        assert!(
            matches!(err, ReverseError::MissingParameter { ref name, repeat: false } if name == "id"),
            "{}",
            pattern
        );
    }
}

#[test]
fn numbers_and_strings_match() {
    let numeric = reverse_url("/:id", &params! { "id" => 1 });
    let text = reverse_url("/:id", &params! { "id" => "1" });
    assert_eq!(numeric, text);

    let float = reverse_url("/:v", &params! { "v" => 1.5 });
    assert_eq!(float.as_deref(), Ok("/1.5"));
}

#[test]
fn invalid_regex() {
    let err = reverse_url("/:id(a(?<=b))", &params! { "id" => "a" }).unwrap_err();
    match err {
        ReverseError::Pattern(PatternError::InvalidRegex { name, .. }) => assert_eq!(name, "id"),
        err => panic!("unexpected error: {:?}", err),
    }
}

#[test]
fn params_from_iterator() {
    let params = vec![("id", ParamValue::from(1)), ("next", ParamValue::from("test"))]
        .into_iter()
        .collect::<Params>();

    assert_eq!(
        reverse_url("/:id/sub/:next", &params).as_deref(),
        Ok("/1/sub/test")
    );
}

#[test]
fn concurrent_resolution() {
    let resolver = Resolver::new();

    std::thread::scope(|scope| {
        for id in 0..8 {
            let resolver = &resolver;
            scope.spawn(move || {
                for _ in 0..100 {
                    let url = resolver
                        .reverse("/users/:id/posts/:post?", &params! { "id" => id })
                        .unwrap();
                    assert_eq!(url, format!("/users/{}/posts", id));
                }
            });
        }
    });

    assert_eq!(resolver.cached(), 1);
}
