use askama::Template;
use axum::response::IntoResponse;

pub struct DocumentLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub struct DocumentSection {
    pub heading: &'static str,
    pub links: &'static [DocumentLink],
}

const PRAXIS: &[DocumentLink] = &[
    DocumentLink {
        label: "Rutiner för alkoholservering",
        href: "/praxis/alkoholservering",
    },
    DocumentLink {
        label: "Praxis för lokalbokning",
        href: "/praxis/lokalbokning",
    },
    DocumentLink {
        label: "Hantering av personuppgifter",
        href: "/praxis/personuppgifter",
    },
    DocumentLink {
        label: "Praxis för utlägg",
        href: "/praxis/utlagg",
    },
];

const TEMPLATES: &[DocumentLink] = &[
    DocumentLink {
        label: "Utläggsblankett",
        href: "https://drive.google.com/file/d/1rOzE5IwIRqV0D89qd5f0i-CnTebz8Y3h/view",
    },
    DocumentLink {
        label: "Milersättningsblankett",
        href: "https://drive.google.com/file/d/1aBCjU8wfLI5NwNNPjf-RabC1G4ZxM-wn/view",
    },
    DocumentLink {
        label: "Mall för motion",
        href: "https://docs.google.com/document/d/17srFoYElH16ysq_xeu_jlue3W4cxYeJsYgRA2FRWLus",
    },
    DocumentLink {
        label: "Mall för äskan",
        href: "https://docs.google.com/document/d/1-LNWlpYvrYVFwJ9H9fZZO4-a9XAB8KLULQGBnuCX8pQ",
    },
];

pub const SECTIONS: &[DocumentSection] = &[
    DocumentSection {
        heading: "Praxisdokument",
        links: PRAXIS,
    },
    DocumentSection {
        heading: "Blanketter, mallar och lathundar",
        links: TEMPLATES,
    },
];

#[derive(Template)]
#[template(path = "dokument.html")]
pub struct DocumentsTemplate {
    pub sections: &'static [DocumentSection],
}

pub async fn documents_page() -> impl IntoResponse {
    DocumentsTemplate { sections: SECTIONS }
}
