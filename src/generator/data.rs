use serde::Serialize;

/// The copy of the post embedded in its page as `window.BLOG_POST_DATA`.
#[derive(Serialize, Debug)]
pub(super) struct EmbeddedPost<'a> {
    pub title: &'a str,
    pub date: &'a str,
    pub content: &'a str,
}

#[derive(Serialize, Debug)]
pub(super) struct OgTagsData<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub url: String,
    pub image: String,
    pub image_width: u32,
    pub image_height: u32,
}

#[derive(Serialize, Debug)]
pub(super) struct PostScriptData {
    pub id: String,
    pub data: String,
}
