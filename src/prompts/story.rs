//! 故事提示词：大纲与正文分部生成

use crate::config::AppConfig;

/// 大纲提示词
pub fn outline_prompt(cfg: &AppConfig) -> String {
    format!(
        r#"请为一个{genre}类型的短篇小说创作大纲，要求如下：

标题：{title}
主题：{theme}
目标字数：{word_count}字

要求：
1. 列出故事的主要情节发展脉络
2. 设计合理的故事结构和冲突
3. 明确故事的起承转合
4. 突出主题的表达
5. 确保故事的完整性
6. 在大纲中明确指出每个关键场景中的主要人物
7. 为每个主要人物预留成长和转变的空间

请按照以下格式输出：

## 主要人物
[列出故事中的主要人物及其基本特征]

## 故事大纲
1. 开篇：[简要说明，包含相关人物]
2. 发展：[简要说明，包含相关人物]
3. 高潮：[简要说明，包含相关人物]
4. 结局：[简要说明，包含相关人物]

## 人物关系
[简要说明主要人物之间的关系]"#,
        genre = cfg.novel.genre,
        title = cfg.novel.title,
        theme = cfg.novel.theme,
        word_count = cfg.novel.word_count,
    )
}

/// 正文分部提示词：部分名固定为 开篇/发展/高潮/结局，
/// context 为已生成的前文（开篇阶段为 None），仅向后文提供前文，绝不反向。
pub fn section_prompt(
    cfg: &AppConfig,
    outline: &str,
    characters: &str,
    context: Option<&str>,
    part_name: &str,
) -> String {
    let mut prompt = format!(
        r#"你是一位{role}，请根据以下信息创作小说内容：

标题：{title}
类型：{genre}
主题：{theme}
目标读者：{audience}
目标字数：本部分约{part_words}字

写作要求：
1. 叙事视角：{perspective}
2. 时态：{tense}
3. 语气：{tone}
4. 对话风格：{dialogue}

故事大纲：
{outline}

人物设定：
{characters}"#,
        role = cfg.author.role,
        title = cfg.novel.title,
        genre = cfg.novel.genre,
        theme = cfg.novel.theme,
        audience = cfg.novel.target_audience,
        part_words = cfg.novel.word_count / 4,
        perspective = cfg.style.narrative_perspective,
        tense = cfg.style.tense,
        tone = cfg.style.tone,
        dialogue = cfg.style.dialogue_style,
        outline = outline,
        characters = characters,
    );

    if let Some(context) = context {
        prompt.push_str(&format!(
            r#"

【前情提要】
{}

请在创作新内容时：
1. 保持人物性格的连贯性
2. 基于前文的人物关系继续发展
3. 展现人物的新面向
4. 深化人物的情感变化
5. 通过细节凸显人物特点"#,
            context
        ));
    }

    prompt.push_str(&format!(
        r#"

【当前任务】
请创作"{}"部分的内容。要求：
1. 确保内容与前文自然衔接
2. 聚焦于当前部分的核心情节
3. 不要重复已经写过的内容
4. 不要透露后续剧情
5. 保持人物性格和行为的一致性
6. 通过细节描写和对话推进情节发展

请确保情节发展符合大纲设定，叙事流畅自然，并为后续情节做好铺垫。"#,
        part_name
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_outline_prompt_fields() {
        let mut cfg = AppConfig::default();
        cfg.novel.title = "雪夜列车".to_string();
        cfg.novel.word_count = 12000;
        let prompt = outline_prompt(&cfg);
        assert!(prompt.contains("雪夜列车"));
        assert!(prompt.contains("12000字"));
    }

    #[test]
    fn test_section_prompt_context_block() {
        let cfg = AppConfig::default();
        let without = section_prompt(&cfg, "大纲", "人物", None, "开篇");
        assert!(!without.contains("前情提要"));
        assert!(without.contains("\"开篇\"部分"));

        let with = section_prompt(&cfg, "大纲", "人物", Some("第一部分正文"), "发展");
        assert!(with.contains("前情提要"));
        assert!(with.contains("第一部分正文"));
        assert!(with.contains("\"发展\"部分"));
    }
}
