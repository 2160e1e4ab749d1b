//! Route catalog rendered on the documentation page.

/// One documented endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    pub method: &'static str,
    /// Displayed path pattern.
    pub name: &'static str,
    /// Example link target.
    pub link: &'static str,
    /// May contain inline HTML.
    pub description: &'static str,
}

/// A titled group of endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogGroup {
    pub title: &'static str,
    pub items: &'static [CatalogItem],
}

const fn item(
    method: &'static str,
    name: &'static str,
    link: &'static str,
    description: &'static str,
) -> CatalogItem {
    CatalogItem {
        method,
        name,
        link,
        description,
    }
}

/// Groups in display order.
pub static CATALOG: &[CatalogGroup] = &[
    CatalogGroup {
        title: "This Page",
        items: &[item("GET", "/", "/", "This documentation page.")],
    },
    CatalogGroup {
        title: "HTTP Methods",
        items: &[
            item("DELETE", "/delete", "/delete", "Returns DELETE data."),
            item("GET", "/get", "/get", "Returns GET data."),
            item("PATCH", "/patch", "/patch", "Returns PATCH data, including form <em>data</em>."),
            item("POST", "/post", "/post", "Returns POST data, including form <em>data</em>."),
            item("PUT", "/put", "/put", "Returns PUT data, including form <em>data</em>."),
        ],
    },
    CatalogGroup {
        title: "Auth",
        items: &[item(
            "GET",
            "/basic-auth/{user}/{passwd}",
            "/basic-auth/user/passwd",
            "Challenges HTTP Basic Auth.",
        )],
    },
    CatalogGroup {
        title: "Images",
        items: &[
            item("GET", "/image", "/image", "Returns an image based on the sent <em>Accept</em> header."),
            item("GET", "/image/png", "/image/png", "Returns a PNG image."),
            item("GET", "/image/jpeg", "/image/jpeg", "Returns a JPEG image."),
            item("GET", "/image/webp", "/image/webp", "Returns a WEBP image."),
            item("GET", "/image/svg", "/image/svg", "Returns a SVG image."),
            item("GET", "/image/gif", "/image/gif", "Returns an animated GIF image."),
        ],
    },
    CatalogGroup {
        title: "Request inspection",
        items: &[
            item("GET", "/ip", "/ip", "Returns Origin IP."),
            item("GET", "/user-agent", "/user-agent", "Returns user-agent."),
            item("GET", "/headers", "/headers", "Returns header dict."),
        ],
    },
    CatalogGroup {
        title: "Redirects",
        items: &[item(
            "GET",
            "/redirect-to?url=foo&status_code=307",
            "/redirect-to?url=/get&status_code=307",
            "Redirects to the <em>url</em> parameter with an optional 3xx <em>status_code</em>. \
             POST, PUT and PATCH read both from the form body.",
        )],
    },
    CatalogGroup {
        title: "Dynamic data",
        items: &[
            item(
                "GET",
                "/base64/{value}",
                "/base64/aGVsbG8gd29ybGQNCg==",
                "Decodes base64-encoded string.",
            ),
            item(
                "GET",
                "/bytes/{n}",
                "/bytes/1024",
                "Generates <em>n</em> random bytes of binary data, accepts optional <em>seed</em> integer parameter.",
            ),
            item(
                "GET",
                "/stream-bytes/{n}",
                "/stream-bytes/20925?filename=data.bin",
                "Streams <em>n</em> random bytes of binary data in chunked encoding, accepts optional \
                 <em>seed</em>, <em>filename</em> and <em>chunk_size</em> integer parameters.",
            ),
            item("GET", "/uuid", "/uuid", "Returns UUID4."),
        ],
    },
];
