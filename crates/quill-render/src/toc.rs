//! Table-of-contents markup for blog pages.
//!
//! The mobile and desktop layouts share the section markup and differ only in
//! their wrapper.

use quill_core::util::toc::TocSection;

use crate::escape::{escape_attr, escape_html};

const TOC_ACTIONS: &str = r#"<div class="mt-6 space-y-4 border-t pt-5">
                    <button class="toc-download w-full h-[45px] bg-[#017AFF] rounded-xl flex items-center justify-center text-white font-medium shadow-md">
                        <i class="ph ph-download mr-2"></i>Download Article as PDF
                    </button>
                    <button class="toc-share w-full h-[45px] bg-[#017AFF] rounded-xl flex items-center justify-center text-white font-medium shadow-md">
                        <i class="ph ph-share-network mr-2"></i>Share
                    </button>
                </div>"#;

/// Renders the section list shared by both layouts.
#[must_use]
pub fn render_sections(sections: &[TocSection]) -> String {
    sections
        .iter()
        .map(render_section)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_section(section: &TocSection) -> String {
    let id = escape_attr(&section.anchor_id);
    let label = escape_html(&section.label);
    let subsections = section
        .subsections
        .iter()
        .map(|entry| {
            format!(
                r##"<a href="#{}" class="toc-link toc-sub-link border-l-2 border-gray-200 pl-3">
                                <div class="text-sm">{}</div>
                            </a>"##,
                escape_attr(&entry.anchor_id),
                escape_html(&entry.label),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"<div class="mb-3 toc-section" data-section-id="{id}">
                        <a href="#{id}" data-toggle-target="#sub-{id}" class="toc-link toc-h2-link flex items-center justify-between">
                            <div class="text-base font-medium">{label}</div>
                            <i class="ph ph-caret-down text-xs ml-1 toc-arrow"></i>
                        </a>
                        <div id="sub-{id}" class="toc-subcategories hidden pl-4 mb-3 space-y-2">
                            {subsections}
                        </div>
                    </div>"##
    )
}

/// Collapsible table of contents shown above the article on small screens.
#[must_use]
pub fn render_mobile(sections: &[TocSection]) -> String {
    format!(
        r#"<div class="block lg:hidden px-4 mt-8">
            <div class="relative toc-container p-5 bg-white rounded-xl">
                <h2 class="text-xl font-bold text-[#017AFF] mb-4 border-b pb-3">Table of Contents</h2>
                {}
                {TOC_ACTIONS}
            </div>
        </div>"#,
        render_sections(sections)
    )
}

/// Sticky sidebar table of contents for large screens.
#[must_use]
pub fn render_desktop(sections: &[TocSection]) -> String {
    format!(
        r#"<aside class="sticky top-8 lg:order-1 self-start">
                <div class="p-6 flex flex-col w-full rounded-xl bg-white max-w-[20rem] hidden lg:block max-h-[calc(100vh-4rem)]" style="scroll-behavior: smooth">
                    <h2 class="text-2xl font-bold text-[#017AFF] mb-6 border-b pb-3">Table of Contents</h2>
                    {}
                    {TOC_ACTIONS}
                </div>
            </aside>"#,
        render_sections(sections)
    )
}
