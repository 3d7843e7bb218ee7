//! 重写提示词：阶段自评反馈与最终重写
//!
//! 自评反馈要求固定的四个小节（优点 / 需要改进 / 修改建议 / 深化建议），
//! score::feedback 按这四个标记打分，二者必须保持一致。

/// 自评反馈提示词；kind 为被评内容类型（大纲 / 人物设定 / 正文）
pub fn feedback_prompt(kind: &str) -> String {
    format!(
        r#"你是一位严格的文学编辑，请对下面提供的{kind}给出具体、逐条的修改反馈。

请严格按照以下格式输出，每一节都用无序列表逐条列出：

## 优点
[逐条列出值得保留的亮点]

## 需要改进
[逐条列出存在的问题]

## 修改建议
[逐条给出可直接执行的修改方案]

## 深化建议
[逐条给出进一步深化主题或人物的方向]

要求：
1. 每条意见都要具体，指明位置或引用原文
2. 不要空泛的赞美或批评
3. 修改建议要可执行，而不是原则性口号"#,
        kind = kind
    )
}

/// 自评反馈用户提示词：附上待评内容
pub fn feedback_user_prompt(kind: &str, content: &str) -> String {
    format!("以下是需要反馈的{}：\n\n{}", kind, content)
}

/// 最终重写分析提示词：对整部小说做结构性分析
pub fn final_analysis_prompt() -> String {
    r#"你是一位资深编辑，请对整部小说进行结构性分析，重点检查：

1. 正文与大纲、人物设定的一致性
2. 各部分之间的情节连贯性与衔接
3. 重复的描写、对话或桥段
4. 语言风格的统一性

请严格按照以下格式输出，每一节逐条列出：

## 优点
[逐条]

## 需要改进
[逐条]

## 修改建议
[逐条，可直接执行]

## 深化建议
[逐条]"#
        .to_string()
}

/// 最终重写分析用户提示词：附上大纲、人物与全文
pub fn final_analysis_user_prompt(outline: &str, characters: &str, content: &str) -> String {
    format!(
        "【故事大纲】\n{}\n\n【人物设定】\n{}\n\n【小说全文】\n{}",
        outline, characters, content
    )
}

/// 最终重写提示词：依据分析结果重写全文
pub fn final_fix_prompt(content: &str, analysis: &str) -> String {
    format!(
        r#"请根据以下分析意见对小说全文进行重写。保留原有的情节框架与人物设定，
重点解决分析中指出的问题，输出完整的重写后全文，不要输出任何解释。

【分析意见】
{}

【小说全文】
{}"#,
        analysis, content
    )
}
