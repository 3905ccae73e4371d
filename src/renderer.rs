use anyhow::Context;
use handlebars::Handlebars;

pub(crate) const OG_TAGS: &str = "og_tags";
pub(crate) const POST_SCRIPT: &str = "post_script";

pub(crate) const OG_IMAGE_WIDTH: u32 = 1200;
pub(crate) const OG_IMAGE_HEIGHT: u32 = 630;

// Must stay matchable by `generator::OG_BLOCK_PATTERN` so a generated page
// can itself serve as a template.
const OG_TAGS_TEMPLATE: &str = concat!(
    "    <!-- Open Graph / Social Media Meta Tags -->\n",
    "    <meta property=\"og:title\" content=\"{{title}}\" />\n",
    "    <meta property=\"og:description\" content=\"{{description}}\" />\n",
    "    <meta property=\"og:url\" content=\"{{url}}\" />\n",
    "    <meta property=\"og:type\" content=\"article\" />\n",
    "    <meta property=\"og:image\" content=\"{{image}}\" />\n",
    "    <meta property=\"og:image:width\" content=\"{{image_width}}\" />\n",
    "    <meta property=\"og:image:height\" content=\"{{image_height}}\" />",
);

// `id` and `data` are already JSON, so they go in unescaped.
const POST_SCRIPT_TEMPLATE: &str = concat!(
    "\n",
    "    <script>\n",
    "        // Auto-load this specific blog post\n",
    "        window.BLOG_POST_ID = {{{id}}};\n",
    "\n",
    "        // Embedded blog data\n",
    "        window.BLOG_POST_DATA = {{{data}}};\n",
    "    </script>\n",
);

pub(crate) fn generate_renderer() -> anyhow::Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars
        .register_template_string(OG_TAGS, OG_TAGS_TEMPLATE)
        .context("og_tags template")?;
    handlebars
        .register_template_string(POST_SCRIPT, POST_SCRIPT_TEMPLATE)
        .context("post_script template")?;

    Ok(handlebars)
}
